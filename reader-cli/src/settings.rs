use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reader_app::EffectiveTheme;
use reader_client::DEFAULT_BASE_URL;

const PREFS_DIR: &str = "blog-reader";
const PREFS_FILE: &str = "prefs.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub http_timeout: Duration,
    pub prefs_path: PathBuf,
    /// Схема «устройства» для темы `system`; `None`, если узнать не удалось.
    pub device_theme: Option<EffectiveTheme>,
    pub log_level: String,
    pub query_retries: u32,
    pub stale_time: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Тот же разбор, но переменные берутся из `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("READER_API_BASE_URL")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let http_timeout_secs = parse_positive_u64(&lookup, "READER_HTTP_TIMEOUT_SECS", 10)?;
        let prefs_path = lookup("READER_PREFS_PATH")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_prefs_path);
        let device_theme = match lookup("READER_DEVICE_THEME").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => Some(
                raw.parse::<EffectiveTheme>()
                    .context("Failed to parse READER_DEVICE_THEME, expecting light or dark")?,
            ),
            None => lookup("COLORFGBG").and_then(|raw| scheme_from_colorfgbg(&raw)),
        };
        let log_level = lookup("LOG_LEVEL")
            .or_else(|| lookup("RUST_LOG"))
            .unwrap_or_else(|| "warn".to_string());
        let query_retries = parse_u32(&lookup, "READER_QUERY_RETRIES", 2)?;
        let stale_secs = parse_u64(&lookup, "READER_STALE_SECS", 300)?;

        Ok(Self {
            base_url,
            http_timeout: Duration::from_secs(http_timeout_secs),
            prefs_path,
            device_theme,
            log_level,
            query_retries,
            stale_time: Duration::from_secs(stale_secs),
        })
    }
}

fn default_prefs_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PREFS_DIR)
        .join(PREFS_FILE)
}

/// `COLORFGBG` выглядит как `fg;bg` (иногда `fg;default;bg`); тёмными
/// считаются фоны 0-6 и 8.
pub fn scheme_from_colorfgbg(raw: &str) -> Option<EffectiveTheme> {
    let background = raw.rsplit(';').next()?.trim().parse::<u8>().ok()?;
    match background {
        0..=6 | 8 => Some(EffectiveTheme::Dark),
        _ => Some(EffectiveTheme::Light),
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting non-negative integer"))
}

fn parse_positive_u64<F>(lookup: &F, key: &str, default: u64) -> Result<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_u64(lookup, key, default)?;
    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u32<F>(lookup: &F, key: &str, default: u32) -> Result<u32>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Failed to parse {key}, expecting non-negative integer"))
}
