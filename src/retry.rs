/*!
 * Generic retry wrapper with exponential backoff.
 *
 * Wraps any fallible async operation in bounded retry. The wrapper is a pure
 * retry scheduler: it knows nothing about the operation it retries and the
 * final error is propagated unchanged after the last attempt.
 */

use std::future::Future;
use std::time::Duration;

use log::warn;
use rand::Rng;

/// Default maximum number of attempts, including the first
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Invoke `op` until it succeeds or `max_attempts` attempts are exhausted.
///
/// Attempt numbering starts at 0. After a failed attempt with attempts
/// remaining, waits `2^attempt` seconds plus uniform jitter in `[0, 0.5)`
/// seconds before the next attempt. The error from the final attempt is
/// returned unchanged.
pub async fn with_retry<T, E, F, Fut>(max_attempts: u32, mut op: F) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt + 1 >= max_attempts {
                    return Err(e);
                }
                let jitter: f64 = rand::rng().random_range(0.0..0.5);
                let backoff_secs = (1u64 << attempt) as f64 + jitter;
                warn!(
                    "Attempt {}/{} failed: {} - retrying in {:.1}s",
                    attempt + 1,
                    max_attempts,
                    e,
                    backoff_secs
                );
                tokio::time::sleep(Duration::from_secs_f64(backoff_secs)).await;
                attempt += 1;
            }
        }
    }
}
