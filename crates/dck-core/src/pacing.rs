//! Pacing between Telegram API calls.
//!
//! Telegram throttles accounts that poll on a fixed beat; unspecified delays
//! are therefore drawn from a jitter window instead of a constant.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Jitter window bounds, in milliseconds. Draws are from `[MIN, MAX)`.
pub const JITTER_MIN_MS: u64 = 1_000;
pub const JITTER_MAX_MS: u64 = 3_000;

/// How long to suspend before the next API call.
///
/// `Exact(Duration::ZERO)` is a valid zero-length wait, not a "use default"
/// sentinel; callers with no preference say so with `Jitter`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delay {
    /// Uniformly random duration from the jitter window. The reconcile loop
    /// paces itself with `Exact`; this variant is for call sites with no
    /// preference, like the announce-phase message send, which is currently
    /// stubbed out.
    Jitter,
    /// Exactly this duration.
    Exact(Duration),
}

/// Resolve a [`Delay`] to a concrete duration. Split out of [`wait`] so the
/// choice can be tested without sleeping.
pub fn pick_delay(delay: Delay) -> Duration {
    match delay {
        Delay::Exact(d) => d,
        Delay::Jitter => {
            Duration::from_millis(rand::rng().random_range(JITTER_MIN_MS..JITTER_MAX_MS))
        }
    }
}

/// Suspend the calling task for the chosen interval. Cannot fail.
pub async fn wait(delay: Delay) {
    sleep(pick_delay(delay)).await;
}
