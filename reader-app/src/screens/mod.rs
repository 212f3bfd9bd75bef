//! Контроллеры экранов.
//!
//! Каждый экран устроен одинаково: структура состояния, перечисление событий,
//! чистый `apply(event)` и асинхронный драйвер (`load` / `refresh` / `retry`),
//! который выполняет запросы через `BlogApi` и скармливает результаты в
//! `apply`. Драйверы берут `&mut self`, поэтому второй запрос на том же
//! экране не может стартовать, пока не завершился первый.

pub mod about;
pub mod home;
pub mod post_details;
pub mod settings;
pub mod user_posts;

use reader_client::{ApiError, ApiResult};

pub use about::{ABOUT, AboutContent, Technology};
pub use home::{HomeEvent, HomeScreen};
pub use post_details::{PostDetailsEvent, PostDetailsScreen};
pub use settings::{SettingsAction, SettingsScreen, ThemeOption};
pub use user_posts::{UserPostsEvent, UserPostsParams, UserPostsScreen};

/// Состояние одного запроса.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Remote<T> {
    /// Запрос не выполнялся (или выключен).
    #[default]
    Idle,
    Loading,
    Failed(ApiError),
    Ready(T),
}

impl<T> Remote<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl<T> From<ApiResult<T>> for Remote<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err),
        }
    }
}

/// Что показывает экран целиком.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenStatus {
    Loading,
    Error(String),
    Empty,
    Loaded,
}
