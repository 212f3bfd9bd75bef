use crate::theme::Palette;

/// Вкладки нижней панели.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Home,
    About,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Home, Tab::About, Tab::Settings];

    pub fn route(self) -> Route {
        match self {
            Self::Home => Route::Home,
            Self::About => Route::About,
            Self::Settings => Route::Settings,
        }
    }

    pub fn name(self) -> &'static str {
        self.route().config().name
    }
}

/// Экран вместе с параметрами навигации.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Settings,
    PostDetails { post_id: i64 },
    UserPosts { user_id: i64, user_name: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Tab,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteConfig {
    pub name: &'static str,
    pub title: &'static str,
    pub presentation: Presentation,
    pub header_shown: bool,
}

/// Статический граф маршрутов: три вкладки и два модальных экрана.
pub static ROUTES: [RouteConfig; 5] = [
    RouteConfig {
        name: "Home",
        title: "Home",
        presentation: Presentation::Tab,
        header_shown: true,
    },
    RouteConfig {
        name: "About",
        title: "About",
        presentation: Presentation::Tab,
        header_shown: true,
    },
    RouteConfig {
        name: "Settings",
        title: "Settings",
        presentation: Presentation::Tab,
        header_shown: true,
    },
    RouteConfig {
        name: "PostDetails",
        title: "Post Details",
        presentation: Presentation::Modal,
        header_shown: true,
    },
    RouteConfig {
        name: "UserPosts",
        title: "User Posts",
        presentation: Presentation::Modal,
        header_shown: true,
    },
];

impl Route {
    pub fn config(&self) -> &'static RouteConfig {
        let index = match self {
            Self::Home => 0,
            Self::About => 1,
            Self::Settings => 2,
            Self::PostDetails { .. } => 3,
            Self::UserPosts { .. } => 4,
        };
        &ROUTES[index]
    }

    pub fn tab(&self) -> Option<Tab> {
        match self {
            Self::Home => Some(Tab::Home),
            Self::About => Some(Tab::About),
            Self::Settings => Some(Tab::Settings),
            Self::PostDetails { .. } | Self::UserPosts { .. } => None,
        }
    }

    pub fn is_modal(&self) -> bool {
        self.config().presentation == Presentation::Modal
    }
}

/// Цвета заголовка экрана.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background: &'static str,
    pub tint: &'static str,
}

/// Модальные экраны рисуют заголовок на фоне карточки, вкладки на фоне экрана.
pub fn header_style(route: &Route, palette: &'static Palette) -> HeaderStyle {
    let background = match route.config().presentation {
        Presentation::Modal => palette.card_background,
        Presentation::Tab => palette.background,
    };
    HeaderStyle {
        background,
        tint: palette.text,
    }
}

/// Корневой стек: активная вкладка плюс стопка модальных экранов поверх неё.
#[derive(Debug, Clone)]
pub struct Navigator {
    tab: Tab,
    modals: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            tab: Tab::Home,
            modals: Vec::new(),
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.tab
    }

    pub fn current(&self) -> Route {
        self.modals
            .last()
            .cloned()
            .unwrap_or_else(|| self.tab.route())
    }

    pub fn depth(&self) -> usize {
        self.modals.len()
    }

    /// Вкладка переключается и закрывает все модальные экраны; модальный
    /// маршрут кладётся поверх стека.
    pub fn navigate(&mut self, route: Route) {
        match route.tab() {
            Some(tab) => {
                self.tab = tab;
                self.modals.clear();
            }
            None => self.modals.push(route),
        }
        tracing::debug!(route = self.current().config().name, depth = self.depth(), "navigated");
    }

    /// `false`, если закрывать уже нечего.
    pub fn go_back(&mut self) -> bool {
        self.modals.pop().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{DARK, LIGHT};

    #[test]
    fn starts_on_home_tab() {
        let nav = Navigator::new();
        assert_eq!(nav.current(), Route::Home);
        assert_eq!(nav.depth(), 0);
    }

    #[test]
    fn modal_routes_stack_and_pop() {
        let mut nav = Navigator::new();
        nav.navigate(Route::PostDetails { post_id: 1 });
        nav.navigate(Route::UserPosts {
            user_id: 3,
            user_name: Some("Clementine".to_string()),
        });
        nav.navigate(Route::PostDetails { post_id: 21 });
        assert_eq!(nav.depth(), 3);
        assert_eq!(nav.current(), Route::PostDetails { post_id: 21 });

        assert!(nav.go_back());
        assert!(matches!(nav.current(), Route::UserPosts { user_id: 3, .. }));
        assert!(nav.go_back());
        assert!(nav.go_back());
        assert_eq!(nav.current(), Route::Home);
        assert!(!nav.go_back());
    }

    #[test]
    fn switching_tab_dismisses_modals() {
        let mut nav = Navigator::new();
        nav.navigate(Route::PostDetails { post_id: 1 });
        nav.navigate(Route::Settings);
        assert_eq!(nav.depth(), 0);
        assert_eq!(nav.active_tab(), Tab::Settings);
        assert_eq!(nav.current(), Route::Settings);
    }

    #[test]
    fn modal_titles_and_presentation_are_fixed() {
        let details = Route::PostDetails { post_id: 1 };
        assert_eq!(details.config().title, "Post Details");
        assert!(details.is_modal());

        let user = Route::UserPosts {
            user_id: 1,
            user_name: None,
        };
        assert_eq!(user.config().title, "User Posts");
        assert!(!Route::About.is_modal());
        assert_eq!(Tab::Settings.name(), "Settings");
    }

    #[test]
    fn header_colors_follow_palette() {
        let modal = header_style(&Route::PostDetails { post_id: 1 }, &DARK);
        assert_eq!(modal.background, DARK.card_background);
        assert_eq!(modal.tint, DARK.text);

        let tab = header_style(&Route::Home, &LIGHT);
        assert_eq!(tab.background, LIGHT.background);
    }
}
