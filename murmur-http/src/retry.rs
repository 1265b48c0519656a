//! When to try again, and how long to wait first.
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

const BASE_DELAY_MS: u64 = 200;
const MAX_SHIFT: u32 = 10;
const RATE_LIMIT_FLOOR: Duration = Duration::from_millis(1100);
const RETRY_AFTER_CEILING: Duration = Duration::from_secs(30);

/// Delay before the `retry`th retry (1-based): 200ms, 400ms, 800ms, ...
pub(crate) fn backoff(retry: usize) -> Duration {
    let shift = u32::try_from(retry.saturating_sub(1))
        .unwrap_or(MAX_SHIFT)
        .min(MAX_SHIFT);
    Duration::from_millis(BASE_DELAY_MS << shift)
}

/// Rate limiting and server-side failures are worth another attempt; other
/// statuses will not change on retry.
pub(crate) fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// `Retry-After` (in seconds) wins, clamped to [`RETRY_AFTER_CEILING`]. Without it
/// a 429 waits at least [`RATE_LIMIT_FLOOR`], everything else uses [`backoff`].
pub(crate) fn delay_for_status(status: StatusCode, headers: &HeaderMap, retry: usize) -> Duration {
    if let Some(secs) = retry_after_secs(headers) {
        return Duration::from_secs(secs).min(RETRY_AFTER_CEILING);
    }
    let delay = backoff(retry);
    if status == StatusCode::TOO_MANY_REQUESTS {
        delay.max(RATE_LIMIT_FLOOR)
    } else {
        delay
    }
}

fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()
}
