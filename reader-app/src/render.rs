//! Текстовая отрисовка экранов для терминала.

use chrono::NaiveDate;

use crate::navigator::{Route, Tab, header_style};
use crate::screens::{
    ABOUT, HomeScreen, PostDetailsScreen, ScreenStatus, SettingsScreen, UserPostsScreen, home,
    post_details, settings, user_posts,
};
use crate::theme::{Palette, hex_to_rgb};
use crate::theme_store::ThemeStore;

const RETRY_HINT: &str = "[r] Retry";

pub struct Renderer {
    palette: &'static Palette,
    color: bool,
}

impl Renderer {
    pub fn new(palette: &'static Palette, color: bool) -> Self {
        Self { palette, color }
    }

    pub fn for_store(store: &ThemeStore, color: bool) -> Self {
        Self::new(store.palette(), color)
    }

    fn paint(&self, text: &str, hex: &str) -> String {
        match (self.color, hex_to_rgb(hex)) {
            (true, Some((r, g, b))) => format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m"),
            _ => text.to_string(),
        }
    }

    fn paint_on(&self, text: &str, fg: &str, bg: &str) -> String {
        match (self.color, hex_to_rgb(fg), hex_to_rgb(bg)) {
            (true, Some((r, g, b)), Some((bg_r, bg_g, bg_b))) => {
                format!("\x1b[38;2;{r};{g};{b};48;2;{bg_r};{bg_g};{bg_b}m{text}\x1b[0m")
            }
            _ => self.paint(text, fg),
        }
    }

    fn title(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[1m{}", self.paint(text, self.palette.text))
        } else {
            text.to_string()
        }
    }

    fn secondary(&self, text: &str) -> String {
        self.paint(text, self.palette.text_secondary)
    }

    fn accent(&self, text: &str) -> String {
        self.paint(text, self.palette.accent)
    }

    fn error(&self, text: &str) -> String {
        self.paint(text, self.palette.error)
    }

    /// Заголовок маршрута на фоне из `header_style`; пусто, если у
    /// маршрута заголовок скрыт.
    pub fn header(&self, route: &Route) -> Vec<String> {
        let config = route.config();
        if !config.header_shown {
            return Vec::new();
        }
        let style = header_style(route, self.palette);
        let rule = "─".repeat(config.title.chars().count().max(12));
        vec![
            self.paint_on(config.title, style.tint, style.background),
            self.paint(&rule, self.palette.border),
        ]
    }

    pub fn tab_bar(&self, active: Tab) -> String {
        Tab::ALL
            .iter()
            .map(|tab| {
                if *tab == active {
                    self.accent(&format!("[{}]", tab.name()))
                } else {
                    self.secondary(&format!(" {} ", tab.name()))
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn error_block(&self, title: Option<&str>, message: &str) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(title) = title {
            lines.push(self.title(title));
        }
        lines.push(self.error(message));
        lines.push(self.accent(RETRY_HINT));
        lines
    }

    pub fn home(&self, screen: &HomeScreen) -> Vec<String> {
        match screen.status() {
            ScreenStatus::Loading => vec![self.accent(home::LOADING_TEXT)],
            ScreenStatus::Error(message) => self.error_block(Some(home::ERROR_TITLE), &message),
            ScreenStatus::Empty => vec![self.secondary(home::EMPTY_TEXT), self.accent(RETRY_HINT)],
            ScreenStatus::Loaded => {
                let mut lines = Vec::new();
                if screen.is_refreshing() {
                    lines.push(self.secondary("Refreshing..."));
                }
                for (index, post) in screen.posts().iter().enumerate() {
                    let n = index + 1;
                    lines.push(self.title(&format!("[{n}] {}", one_line(&post.title))));
                    for line in clamp_lines(&post.body, 2) {
                        lines.push(format!("    {}", self.secondary(&line)));
                    }
                    lines.push(format!(
                        "    {}",
                        self.accent(&format!("Read more: open {n} | View author posts: author {n}"))
                    ));
                    lines.push(String::new());
                }
                lines
            }
        }
    }

    pub fn post_details(&self, screen: &PostDetailsScreen) -> Vec<String> {
        match screen.status() {
            ScreenStatus::Loading => vec![self.accent(post_details::LOADING_TEXT)],
            ScreenStatus::Error(message) => self.error_block(None, &message),
            ScreenStatus::Empty | ScreenStatus::Loaded => {
                let mut lines = Vec::new();
                if let Some(post) = screen.post() {
                    lines.push(self.title(&one_line(&post.title)));
                    if let Some(byline) = screen.byline() {
                        lines.push(self.accent(&format!("{byline}  [author]")));
                    }
                    lines.push(String::new());
                    lines.extend(post.body.lines().map(|line| self.paint(line, self.palette.text)));
                }

                lines.push(String::new());
                lines.push(self.title(&screen.comments_title()));
                if screen.comments().is_empty() {
                    lines.push(self.secondary(post_details::NO_COMMENTS_TEXT));
                }
                for comment in screen.comments() {
                    lines.push(self.paint(&one_line(&comment.name), self.palette.text));
                    lines.push(self.secondary(&comment.email));
                    for line in comment.body.lines() {
                        lines.push(format!("  {line}"));
                    }
                    lines.push(self.paint("────", self.palette.border));
                }
                lines
            }
        }
    }

    /// `today` идёт в подвал каждой карточки поста.
    pub fn user_posts(&self, screen: &UserPostsScreen, today: NaiveDate) -> Vec<String> {
        let status = screen.status();
        if status == ScreenStatus::Loading && !screen.is_refreshing() {
            return vec![self.accent("Loading...")];
        }

        let mut lines = vec![self.title(&screen.header()), String::new()];
        match status {
            ScreenStatus::Error(message) => lines.extend(self.error_block(None, &message)),
            ScreenStatus::Empty => lines.push(self.secondary(user_posts::EMPTY_TEXT)),
            ScreenStatus::Loading | ScreenStatus::Loaded => {
                if screen.is_refreshing() {
                    lines.push(self.secondary("Refreshing..."));
                }
                let date = today.format("%b %d, %Y").to_string();
                for (index, post) in screen.posts().iter().enumerate() {
                    lines.push(self.title(&format!("[{}] {}", index + 1, one_line(&post.title))));
                    for line in clamp_lines(&post.body, 3) {
                        lines.push(format!("    {}", self.secondary(&line)));
                    }
                    lines.push(format!("    {}", self.secondary(&date)));
                    lines.push(String::new());
                }
            }
        }
        lines
    }

    pub fn about(&self) -> Vec<String> {
        let mut lines = vec![
            self.title(ABOUT.title),
            self.paint(ABOUT.description, self.palette.text),
            String::new(),
            self.title(ABOUT.technologies_title),
        ];
        for (index, tech) in ABOUT.technologies.iter().enumerate() {
            lines.push(format!(
                "[{}] {} {}",
                index + 1,
                self.accent(tech.name),
                self.paint(tech.description, self.palette.text)
            ));
        }
        lines.push(String::new());
        lines.push(self.secondary(ABOUT.footer));
        lines
    }

    pub fn settings(&self, store: &ThemeStore) -> Vec<String> {
        let mut lines = vec![
            self.title(settings::TITLE),
            String::new(),
            self.paint(settings::SECTION_TITLE, self.palette.text),
        ];
        for option in SettingsScreen::options(store) {
            let marker = if option.selected { "(*)" } else { "( )" };
            let text = format!("{marker} {}", option.title);
            lines.push(if option.selected {
                self.accent(&text)
            } else {
                self.paint(&text, self.palette.text)
            });
        }

        let switch = if SettingsScreen::uses_system(store) {
            "[x]"
        } else {
            "[ ]"
        };
        lines.push(self.paint(
            &format!("{switch} {}", settings::SYSTEM_SWITCH_LABEL),
            self.palette.text,
        ));
        lines.push(String::new());
        lines.push(self.secondary(&format!(
            "Preference: {} (applied: {})",
            store.preference(),
            store.effective()
        )));
        lines.push(self.secondary(settings::NOTE));
        lines
    }
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Первые `max` строк текста; если что-то отрезано, последняя получает «…».
fn clamp_lines(text: &str, max: usize) -> Vec<String> {
    let all: Vec<&str> = text.lines().collect();
    let mut kept: Vec<String> = all.iter().take(max).map(|line| line.to_string()).collect();
    if all.len() > max {
        if let Some(last) = kept.last_mut() {
            last.push('…');
        }
    }
    kept
}
