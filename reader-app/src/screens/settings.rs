use crate::theme::{EffectiveTheme, ThemePreference};
use crate::theme_store::ThemeStore;

pub const TITLE: &str = "Theme Settings";
pub const SECTION_TITLE: &str = "Choose Theme";
pub const SYSTEM_SWITCH_LABEL: &str = "Use System Theme";
pub const NOTE: &str = "Changes are applied immediately and saved for your next visit.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    LightMode,
    DarkMode,
    ToggleSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeOption {
    pub title: &'static str,
    pub selected: bool,
    pub action: SettingsAction,
}

/// Экран настроек темы; своего состояния нет, всё живёт в `ThemeStore`.
pub struct SettingsScreen;

impl SettingsScreen {
    /// Light/Dark выделены, только если предпочтение задано явно.
    pub fn options(store: &ThemeStore) -> [ThemeOption; 2] {
        let preference = store.preference();
        [
            ThemeOption {
                title: "Light Mode",
                selected: preference == ThemePreference::Light,
                action: SettingsAction::LightMode,
            },
            ThemeOption {
                title: "Dark Mode",
                selected: preference == ThemePreference::Dark,
                action: SettingsAction::DarkMode,
            },
        ]
    }

    pub fn uses_system(store: &ThemeStore) -> bool {
        store.preference() == ThemePreference::System
    }

    /// Выключение системной темы закрепляет ту, что применена сейчас.
    pub fn apply(store: &mut ThemeStore, action: SettingsAction) {
        let next = match action {
            SettingsAction::LightMode => ThemePreference::Light,
            SettingsAction::DarkMode => ThemePreference::Dark,
            SettingsAction::ToggleSystem if Self::uses_system(store) => {
                match store.effective() {
                    EffectiveTheme::Light => ThemePreference::Light,
                    EffectiveTheme::Dark => ThemePreference::Dark,
                }
            }
            SettingsAction::ToggleSystem => ThemePreference::System,
        };
        store.set_theme(next);
    }
}
