//! Интерактивная сессия `browse`: команды читаются построчно из stdin,
//! после каждой текущий маршрут перерисовывается.

use std::io::Write;

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use reader_app::screens::{
    ABOUT, HomeScreen, PostDetailsScreen, SettingsAction, SettingsScreen, UserPostsParams,
    UserPostsScreen,
};
use reader_app::{
    Navigator, QueryOptions, Renderer, Route, Tab, ThemePreference, ThemeSnapshot, ThemeStore,
};
use reader_client::BlogApi;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

pub const HELP: &str = "commands: open N | author [N] | back | tab home|about|settings | \
refresh | retry | theme light|dark|system|toggle | switch | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeChoice {
    Set(ThemePreference),
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseCommand {
    /// Номер строки на экране, с единицы.
    Open(usize),
    Author(Option<usize>),
    Back,
    Tab(Tab),
    Refresh,
    Retry,
    Theme(ThemeChoice),
    /// Переключатель «Use System Theme».
    Switch,
    Help,
    Quit,
}

/// Пустая строка даёт `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<BrowseCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        bail!("too many arguments; {HELP}");
    }

    let command = match (head.to_ascii_lowercase().as_str(), arg) {
        ("open" | "o", Some(n)) => BrowseCommand::Open(parse_row(n)?),
        ("author" | "a", n) => BrowseCommand::Author(n.map(parse_row).transpose()?),
        ("back" | "b", None) => BrowseCommand::Back,
        ("tab", Some(name)) => BrowseCommand::Tab(parse_tab(name)?),
        ("refresh", None) => BrowseCommand::Refresh,
        ("retry" | "r", None) => BrowseCommand::Retry,
        ("theme", Some("toggle")) => BrowseCommand::Theme(ThemeChoice::Toggle),
        ("theme", Some(raw)) => BrowseCommand::Theme(ThemeChoice::Set(
            raw.parse::<ThemePreference>()
                .map_err(|err| anyhow!("{err}"))?,
        )),
        ("switch", None) => BrowseCommand::Switch,
        ("help" | "?", None) => BrowseCommand::Help,
        ("quit" | "q" | "exit", None) => BrowseCommand::Quit,
        _ => bail!("unknown command {line:?}; {HELP}"),
    };
    Ok(Some(command))
}

fn parse_row(raw: &str) -> Result<usize> {
    let n = raw
        .parse::<usize>()
        .with_context(|| format!("expected a row number, got {raw:?}"))?;
    if n == 0 {
        bail!("rows are numbered from 1");
    }
    Ok(n)
}

fn parse_tab(raw: &str) -> Result<Tab> {
    Tab::ALL
        .into_iter()
        .find(|tab| tab.name().eq_ignore_ascii_case(raw))
        .ok_or_else(|| anyhow!("unknown tab {raw:?}, expected home, about or settings"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

enum ModalScreen {
    PostDetails(PostDetailsScreen),
    UserPosts(UserPostsScreen),
}

/// Состояние интерактивной сессии. Стек `modals` идёт параллельно
/// модальным маршрутам навигатора.
pub struct Session<'a, A: ?Sized> {
    api: &'a A,
    store: ThemeStore,
    theme_rx: watch::Receiver<ThemeSnapshot>,
    navigator: Navigator,
    home: HomeScreen,
    modals: Vec<ModalScreen>,
    options: QueryOptions,
    color: bool,
    notice: Option<String>,
}

impl<'a, A> Session<'a, A>
where
    A: BlogApi + ?Sized,
{
    pub fn new(api: &'a A, store: ThemeStore, options: QueryOptions, color: bool) -> Self {
        let theme_rx = store.subscribe();
        Self {
            api,
            store,
            theme_rx,
            navigator: Navigator::new(),
            home: HomeScreen::new(options),
            modals: Vec::new(),
            options,
            color,
            notice: None,
        }
    }

    pub fn current(&self) -> Route {
        self.navigator.current()
    }

    pub fn store(&self) -> &ThemeStore {
        &self.store
    }

    pub async fn start(&mut self) {
        self.home.load(self.api).await;
    }

    pub async fn handle(&mut self, command: BrowseCommand) -> Flow {
        self.notice = None;
        match command {
            BrowseCommand::Open(n) => self.open(n.saturating_sub(1)).await,
            BrowseCommand::Author(n) => self.author(n.map(|n| n.saturating_sub(1))).await,
            BrowseCommand::Back => {
                if self.navigator.go_back() {
                    self.modals.pop();
                } else {
                    self.notice = Some("Nothing to go back to".to_string());
                }
            }
            BrowseCommand::Tab(tab) => self.navigate(tab.route()).await,
            BrowseCommand::Refresh => self.reload(true).await,
            BrowseCommand::Retry => self.reload(false).await,
            BrowseCommand::Theme(ThemeChoice::Toggle) => {
                self.store.toggle_theme();
            }
            BrowseCommand::Theme(ThemeChoice::Set(preference)) => match preference {
                ThemePreference::Light => {
                    SettingsScreen::apply(&mut self.store, SettingsAction::LightMode)
                }
                ThemePreference::Dark => {
                    SettingsScreen::apply(&mut self.store, SettingsAction::DarkMode)
                }
                ThemePreference::System => self.store.set_theme(ThemePreference::System),
            },
            BrowseCommand::Switch => {
                SettingsScreen::apply(&mut self.store, SettingsAction::ToggleSystem)
            }
            BrowseCommand::Help => self.notice = Some(HELP.to_string()),
            BrowseCommand::Quit => return Flow::Quit,
        }

        if self.theme_rx.has_changed().unwrap_or(false) {
            let snapshot = *self.theme_rx.borrow_and_update();
            tracing::info!(
                preference = %snapshot.preference,
                effective = %snapshot.effective,
                "theme changed"
            );
        }
        Flow::Continue
    }

    async fn open(&mut self, index: usize) {
        let route = match self.current() {
            Route::Home => self.home.open_post(index),
            Route::UserPosts { .. } => match self.modals.last() {
                Some(ModalScreen::UserPosts(screen)) => screen.open_post(index),
                _ => None,
            },
            Route::About => {
                self.notice = Some(match ABOUT.technology(index) {
                    Some(tech) => format!("{}: {}", tech.name, tech.url),
                    None => format!("No technology #{}", index + 1),
                });
                return;
            }
            Route::PostDetails { .. } | Route::Settings => None,
        };

        match route {
            Some(route) => self.navigate(route).await,
            None => self.notice = Some(format!("Nothing to open at #{}", index + 1)),
        }
    }

    async fn author(&mut self, index: Option<usize>) {
        let route = match (self.current(), index) {
            (Route::Home, Some(index)) => self.home.open_author(index),
            (Route::PostDetails { .. }, _) => match self.modals.last() {
                Some(ModalScreen::PostDetails(screen)) => screen.open_author(),
                _ => None,
            },
            _ => None,
        };

        match route {
            Some(route) => self.navigate(route).await,
            None => self.notice = Some("No author to open here".to_string()),
        }
    }

    async fn navigate(&mut self, route: Route) {
        match &route {
            Route::PostDetails { post_id } => {
                let mut screen = PostDetailsScreen::new(*post_id, self.options);
                screen.load(self.api).await;
                self.modals.push(ModalScreen::PostDetails(screen));
            }
            Route::UserPosts { user_id, user_name } => {
                let mut screen = UserPostsScreen::new(UserPostsParams {
                    user_id: *user_id,
                    user_name: user_name.clone(),
                });
                screen.load(self.api).await;
                self.modals.push(ModalScreen::UserPosts(screen));
            }
            Route::Home => {
                self.modals.clear();
                self.home.load(self.api).await;
            }
            Route::About | Route::Settings => self.modals.clear(),
        }
        self.navigator.navigate(route);
    }

    /// `refreshing = true` для pull-to-refresh, иначе Retry.
    async fn reload(&mut self, refreshing: bool) {
        match (self.navigator.depth(), self.modals.last_mut()) {
            (0, _) if self.navigator.active_tab() == Tab::Home => {
                if refreshing {
                    self.home.refresh(self.api).await;
                } else {
                    self.home.retry(self.api).await;
                }
            }
            (_, Some(ModalScreen::PostDetails(screen))) if refreshing => {
                screen.refresh(self.api).await
            }
            (_, Some(ModalScreen::PostDetails(screen))) => screen.retry(self.api).await,
            (_, Some(ModalScreen::UserPosts(screen))) if refreshing => {
                screen.refresh(self.api).await
            }
            (_, Some(ModalScreen::UserPosts(screen))) => screen.retry(self.api).await,
            _ => self.notice = Some("Nothing to reload here".to_string()),
        }
    }

    pub fn render(&self, today: NaiveDate) -> Vec<String> {
        let renderer = Renderer::for_store(self.store(), self.color);
        let route = self.current();

        let mut lines = renderer.header(&route);
        let body = match (&route, self.modals.last()) {
            (Route::PostDetails { .. }, Some(ModalScreen::PostDetails(screen))) => {
                renderer.post_details(screen)
            }
            (Route::UserPosts { .. }, Some(ModalScreen::UserPosts(screen))) => {
                renderer.user_posts(screen, today)
            }
            (Route::About, _) => renderer.about(),
            (Route::Settings, _) => renderer.settings(self.store()),
            _ => renderer.home(&self.home),
        };
        lines.extend(body);

        lines.push(String::new());
        if route.is_modal() {
            lines.push("[b] back".to_string());
        } else {
            lines.push(renderer.tab_bar(self.navigator.active_tab()));
        }
        if let Some(notice) = &self.notice {
            lines.push(notice.clone());
        }
        lines
    }
}

pub async fn run<A>(session: &mut Session<'_, A>) -> Result<()>
where
    A: BlogApi + ?Sized,
{
    session.start().await;
    print_screen(&session.render(today()))?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read command")? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if session.handle(command).await == Flow::Quit {
            break;
        }
        print_screen(&session.render(today()))?;
    }
    Ok(())
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn print_screen(lines: &[String]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout)?;
    for line in lines {
        writeln!(stdout, "{line}")?;
    }
    write!(stdout, "> ")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reader_app::MemoryStorage;
    use reader_client::{ApiError, ApiResult, Comment, Post, User};
    use serde_json::json;
    use std::sync::Arc;

    struct StaticApi {
        posts: Vec<Post>,
        comments: Vec<Comment>,
        users: Vec<User>,
    }

    impl StaticApi {
        fn new() -> Self {
            let posts = serde_json::from_value(json!([
                {"id": 1, "userId": 1, "title": "first post", "body": "first body"},
                {"id": 2, "userId": 2, "title": "second post", "body": "second body"},
            ]))
            .expect("posts");
            let comments = serde_json::from_value(json!([
                {"id": 1, "postId": 1, "name": "nice", "email": "a@b.c", "body": "agreed"},
            ]))
            .expect("comments");
            let users = serde_json::from_value(json!([{
                "id": 1,
                "name": "Leanne Graham",
                "username": "Bret",
                "email": "Sincere@april.biz",
                "address": {
                    "street": "Kulas Light",
                    "suite": "Apt. 556",
                    "city": "Gwenborough",
                    "zipcode": "92998-3874",
                    "geo": {"lat": "-37.3159", "lng": "81.1496"}
                },
                "phone": "1-770-736-8031 x56442",
                "website": "hildegard.org",
                "company": {
                    "name": "Romaguera-Crona",
                    "catchPhrase": "Multi-layered client-server neural-net",
                    "bs": "harness real-time e-markets"
                }
            }]))
            .expect("users");
            Self {
                posts,
                comments,
                users,
            }
        }
    }

    #[async_trait]
    impl BlogApi for StaticApi {
        async fn posts(&self) -> ApiResult<Vec<Post>> {
            Ok(self.posts.clone())
        }

        async fn post(&self, id: i64) -> ApiResult<Post> {
            self.posts
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(ApiError::NotFound)
        }

        async fn posts_by_user(&self, user_id: i64) -> ApiResult<Vec<Post>> {
            Ok(self
                .posts
                .iter()
                .filter(|p| p.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn comments_for_post(&self, post_id: i64) -> ApiResult<Vec<Comment>> {
            Ok(self
                .comments
                .iter()
                .filter(|c| c.post_id == post_id)
                .cloned()
                .collect())
        }

        async fn user(&self, id: i64) -> ApiResult<User> {
            self.users
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or(ApiError::NotFound)
        }
    }

    fn session(api: &StaticApi) -> Session<'_, StaticApi> {
        let store = ThemeStore::load(Arc::new(MemoryStorage::new()), None);
        Session::new(api, store, QueryOptions::once(), false)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).expect("valid date")
    }

    fn cmd(line: &str) -> BrowseCommand {
        parse_command(line).expect("parses").expect("not blank")
    }

    #[test]
    fn parses_commands() {
        assert_eq!(cmd("open 3"), BrowseCommand::Open(3));
        assert_eq!(cmd("author"), BrowseCommand::Author(None));
        assert_eq!(cmd("a 2"), BrowseCommand::Author(Some(2)));
        assert_eq!(cmd("tab Settings"), BrowseCommand::Tab(Tab::Settings));
        assert_eq!(
            cmd("theme dark"),
            BrowseCommand::Theme(ThemeChoice::Set(ThemePreference::Dark))
        );
        assert_eq!(cmd("theme toggle"), BrowseCommand::Theme(ThemeChoice::Toggle));
        assert_eq!(cmd("q"), BrowseCommand::Quit);
        assert!(parse_command("   ").expect("blank is fine").is_none());
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(parse_command("open 0").is_err());
        assert!(parse_command("open x").is_err());
        assert!(parse_command("tab profile").is_err());
        assert!(parse_command("theme sepia").is_err());
        assert!(parse_command("dance").is_err());
        assert!(parse_command("open 1 2").is_err());
    }

    #[tokio::test]
    async fn opens_post_then_author_then_goes_back() {
        let api = StaticApi::new();
        let mut session = session(&api);
        session.start().await;

        let lines = session.render(date());
        assert!(lines.contains(&"[1] first post".to_string()));
        assert!(lines.contains(&"[2] second post".to_string()));

        session.handle(cmd("open 1")).await;
        assert_eq!(session.current(), Route::PostDetails { post_id: 1 });
        let lines = session.render(date());
        assert_eq!(lines[0], "Post Details");
        assert!(lines.contains(&"Comments (1)".to_string()));

        session.handle(cmd("author")).await;
        assert_eq!(
            session.current(),
            Route::UserPosts {
                user_id: 1,
                user_name: Some("Leanne Graham".to_string())
            }
        );
        let lines = session.render(date());
        assert!(lines.contains(&"Posts by Leanne Graham".to_string()));

        session.handle(cmd("back")).await;
        session.handle(cmd("back")).await;
        assert_eq!(session.current(), Route::Home);

        session.handle(cmd("back")).await;
        let lines = session.render(date());
        assert_eq!(lines.last().map(String::as_str), Some("Nothing to go back to"));
    }

    #[tokio::test]
    async fn home_author_without_name_resolves_user() {
        let api = StaticApi::new();
        let mut session = session(&api);
        session.start().await;

        session.handle(cmd("author 1")).await;
        let lines = session.render(date());
        assert!(lines.contains(&"Posts by Leanne Graham".to_string()));

        // у второго автора нет записи, заголовок остаётся с номером
        session.handle(cmd("tab home")).await;
        session.handle(cmd("author 2")).await;
        let lines = session.render(date());
        assert!(lines.contains(&"Posts by User #2".to_string()));
    }

    #[tokio::test]
    async fn tab_switch_clears_modals() {
        let api = StaticApi::new();
        let mut session = session(&api);
        session.start().await;

        session.handle(cmd("open 2")).await;
        session.handle(cmd("tab about")).await;
        assert_eq!(session.current(), Route::About);

        session.handle(cmd("open 1")).await;
        let lines = session.render(date());
        assert_eq!(
            lines.last().map(String::as_str),
            Some("Rust: https://www.rust-lang.org/")
        );
    }

    #[tokio::test]
    async fn theme_commands_update_store() {
        let api = StaticApi::new();
        let mut session = session(&api);

        session.handle(cmd("tab settings")).await;
        session.handle(cmd("theme dark")).await;
        assert_eq!(session.store().preference(), ThemePreference::Dark);
        assert!(session.render(date()).contains(&"(*) Dark Mode".to_string()));

        session.handle(cmd("switch")).await;
        assert_eq!(session.store().preference(), ThemePreference::System);

        session.handle(cmd("theme toggle")).await;
        assert_eq!(session.store().preference(), ThemePreference::Light);
    }

    #[tokio::test]
    async fn quit_stops_the_session() {
        let api = StaticApi::new();
        let mut session = session(&api);
        assert_eq!(session.handle(cmd("quit")).await, Flow::Quit);
        assert_eq!(session.handle(cmd("help")).await, Flow::Continue);
    }
}
