//! # Time source for backoff waits.
//!
//! The watcher never sleeps directly; it asks a [`Clock`] for a [`Tick`], a
//! single-fire future that completes once the requested duration has elapsed.
//!
//! - [`SystemClock`] backs ticks with `tokio::time::sleep` (monotonic time, not
//!   wall-clock, so system clock adjustments do not shorten or stretch waits).
//! - `MockClock` (feature `test-util`) hands out ticks that only fire when the
//!   test advances virtual time.

#[cfg(any(test, feature = "test-util"))]
mod mock;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockClock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// Single-fire completion signal returned by [`Clock::after`].
pub type Tick = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Produces completion signals after a duration elapses.
pub trait Clock: Send + Sync + 'static {
    /// Returns a future that completes once, after at least `duration`.
    fn after(&self, duration: Duration) -> Tick;
}

/// Real time source backed by the tokio timer.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn after(&self, duration: Duration) -> Tick {
        Box::pin(tokio::time::sleep(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_system_clock_waits_at_least_duration() {
        let start = Instant::now();
        SystemClock.after(Duration::from_secs(3)).await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
