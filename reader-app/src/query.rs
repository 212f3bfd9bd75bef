use std::future::Future;
use std::time::{Duration, Instant};

use reader_client::{ApiError, ApiResult};

const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Политика основного запроса экрана: сколько раз повторять и сколько
/// считать полученные данные свежими.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub retry: u32,
    pub retry_delay: Duration,
    pub stale_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            retry: 2,
            retry_delay: Duration::from_secs(1),
            stale_time: Duration::from_secs(5 * 60),
        }
    }
}

impl QueryOptions {
    /// Без повторов и без свежести: каждый вызов идёт в сеть один раз.
    pub fn once() -> Self {
        Self {
            retry: 0,
            retry_delay: Duration::ZERO,
            stale_time: Duration::ZERO,
        }
    }

    /// Задержка перед повтором номер `attempt` (с нуля): `base * 2^attempt`,
    /// но не больше 30 секунд.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.retry_delay
            .checked_mul(factor)
            .unwrap_or(MAX_RETRY_DELAY)
            .min(MAX_RETRY_DELAY)
    }

    pub fn is_fresh(&self, fetched_at: Instant) -> bool {
        fetched_at.elapsed() < self.stale_time
    }
}

fn is_retryable(err: &ApiError) -> bool {
    !matches!(err, ApiError::NotFound)
}

/// Выполняет `fetch`, повторяя неудачные попытки согласно `options`.
pub async fn run_query<T, F, Fut>(options: &QueryOptions, label: &str, mut fetch: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < options.retry && is_retryable(&err) => {
                let delay = options.backoff(attempt);
                tracing::warn!(query = label, attempt = attempt + 1, ?delay, error = %err, "retrying query");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
