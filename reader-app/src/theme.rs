use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Сохранённое пользователем предпочтение темы.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

/// Тема, которая реально применяется после разрешения `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveTheme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme preference: {0:?} (expected light, dark or system)")]
pub struct ParseThemeError(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown device theme: {0:?} (expected light or dark)")]
pub struct ParseEffectiveThemeError(String);

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [Self::Light, Self::Dark, Self::System];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Следующее значение в цикле `light -> dark -> system -> light`.
    pub fn next(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::System,
            Self::System => Self::Light,
        }
    }

    /// `device`: схема, о которой сообщает устройство; `None`, если
    /// устройство её не знает (тогда светлая).
    pub fn resolve(self, device: Option<EffectiveTheme>) -> EffectiveTheme {
        match self {
            Self::Light => EffectiveTheme::Light,
            Self::Dark => EffectiveTheme::Dark,
            Self::System => device.unwrap_or_default(),
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ParseThemeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(ParseThemeError(other.to_string())),
        }
    }
}

impl EffectiveTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Light => &LIGHT,
            Self::Dark => &DARK,
        }
    }
}

impl fmt::Display for EffectiveTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectiveTheme {
    type Err = ParseEffectiveThemeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ParseEffectiveThemeError(other.to_string())),
        }
    }
}

/// Набор цветов темы (hex `#RRGGBB`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: &'static str,
    pub text: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
    pub card_background: &'static str,
    pub border: &'static str,
    pub error: &'static str,
    pub shadow: &'static str,
    pub notification: &'static str,
}

pub static LIGHT: Palette = Palette {
    background: "#FFFFFF",
    text: "#000000",
    text_secondary: "#666666",
    accent: "#007AFF",
    card_background: "#F2F2F7",
    border: "#E5E5EA",
    error: "#FF3B30",
    shadow: "#000000",
    notification: "#FF9500",
};

pub static DARK: Palette = Palette {
    background: "#121212",
    text: "#FFFFFF",
    text_secondary: "#BBBBBB",
    accent: "#0A84FF",
    card_background: "#1C1C1E",
    border: "#2C2C2E",
    error: "#FF453A",
    shadow: "#000000",
    notification: "#FFD60A",
};

/// Разбирает `#RRGGBB` в компоненты.
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}
