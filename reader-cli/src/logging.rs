use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

const FALLBACK_FILTER: &str = "warn";

/// Фильтр из `LOG_LEVEL` (или `RUST_LOG`). Пустое значение означает `warn`;
/// неразборчивое тоже, но тогда вторым элементом возвращается причина.
fn build_filter(directive: &str) -> (EnvFilter, Option<String>) {
    let directive = directive.trim();
    if directive.is_empty() {
        return (EnvFilter::new(FALLBACK_FILTER), None);
    }
    match EnvFilter::try_new(directive) {
        Ok(filter) => (filter, None),
        Err(err) => (
            EnvFilter::new(FALLBACK_FILTER),
            Some(format!("{directive:?}: {err}")),
        ),
    }
}

/// Логи идут в stderr, экраны в stdout. Цвет в логах только когда stderr
/// это терминал и пользователь не просил `--no-color`.
pub fn init_logging(directive: &str, ansi: bool) -> Result<()> {
    let (filter, rejected) = build_filter(directive);

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    if let Some(reason) = rejected {
        tracing::warn!(%reason, "invalid log filter, falling back to {FALLBACK_FILTER}");
    }
    Ok(())
}
