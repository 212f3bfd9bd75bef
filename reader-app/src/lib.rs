//! Состояние приложения-читалки: тема, навигация, экраны и их отрисовка.
//!
//! Крейт не знает, откуда приходят данные: экраны работают через трейт
//! `reader_client::BlogApi`, а тема хранится через `PreferenceStorage`.

pub mod navigator;
pub mod query;
pub mod render;
pub mod screens;
pub mod storage;
pub mod theme;
pub mod theme_store;

pub use navigator::{Navigator, Route, Tab};
pub use query::QueryOptions;
pub use render::Renderer;
pub use storage::{FileStorage, MemoryStorage, PreferenceStorage, StorageError, THEME_KEY};
pub use theme::{EffectiveTheme, Palette, ThemePreference};
pub use theme_store::{ThemeSnapshot, ThemeStore};
