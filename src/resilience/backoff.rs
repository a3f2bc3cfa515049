//! Delay between retry attempts.

use rand::Rng;
use std::time::Duration;

use crate::config::schema::BackoffKind;

/// Exponential backoff with jitter, never exceeding `max_ms`.
///
/// `retry` counts from 1 (the pause before the second attempt).
pub fn calculate_backoff(retry: u32, base_ms: u64, max_ms: u64) -> Duration {
    if retry == 0 {
        return Duration::from_millis(0);
    }

    let factor = 2u64.saturating_pow(retry - 1);
    let capped = base_ms.saturating_mul(factor).min(max_ms);

    // Up to 10% jitter, clipped to the cap
    let jitter_range = capped / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped.saturating_add(jitter).min(max_ms))
}

/// Pause before retry number `retry` for the given strategy.
pub fn retry_delay(kind: BackoffKind, retry: u32, base_ms: u64, max_ms: u64) -> Duration {
    match kind {
        BackoffKind::Fixed => Duration::from_millis(base_ms),
        BackoffKind::Exponential => calculate_backoff(retry, base_ms, max_ms),
    }
}
