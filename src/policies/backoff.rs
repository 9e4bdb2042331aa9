//! # Backoff interval generators.
//!
//! A [`Backoff`] produces the delay to wait before the next probe attempt.
//! It is stateful: each [`Backoff::next_interval`] call advances the sequence,
//! and [`Backoff::reset`] rewinds it so the next call returns the first value again.
//!
//! Built-in generators:
//! - [`ZeroBackoff`] never waits (useful in tests and tight loops)
//! - [`ConstantBackoff`] always waits the same duration
//! - [`ExponentialBackoff`](crate::ExponentialBackoff) grows geometrically with jitter
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{Backoff, ConstantBackoff, ZeroBackoff};
//!
//! let mut zero = ZeroBackoff;
//! assert_eq!(zero.next_interval(), Duration::ZERO);
//!
//! let mut constant = ConstantBackoff::new(Duration::from_secs(25));
//! assert_eq!(constant.next_interval(), Duration::from_secs(25));
//! constant.reset();
//! assert_eq!(constant.next_interval(), Duration::from_secs(25));
//! ```

use std::time::Duration;

/// Stateful generator of retry delays.
///
/// The watcher owns its generator exclusively, so both operations take `&mut self`.
///
/// ### Contract
/// After [`reset`](Backoff::reset), the next [`next_interval`](Backoff::next_interval)
/// returns the same value the very first call on a fresh instance would.
pub trait Backoff: Send + 'static {
    /// Advances the sequence and returns the next delay.
    fn next_interval(&mut self) -> Duration;

    /// Rewinds the sequence to its initial state.
    fn reset(&mut self);
}

impl<B: Backoff + ?Sized> Backoff for Box<B> {
    fn next_interval(&mut self) -> Duration {
        (**self).next_interval()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// Backoff that never waits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ZeroBackoff;

impl Backoff for ZeroBackoff {
    fn next_interval(&mut self) -> Duration {
        Duration::ZERO
    }

    fn reset(&mut self) {}
}

/// Backoff that always waits the same duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstantBackoff {
    interval: Duration,
}

impl ConstantBackoff {
    /// Creates a generator that always returns `interval`.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the configured interval.
    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Backoff for ConstantBackoff {
    fn next_interval(&mut self) -> Duration {
        self.interval
    }

    fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn take(b: &mut impl Backoff, n: usize) -> Vec<Duration> {
        (0..n).map(|_| b.next_interval()).collect()
    }

    #[test]
    fn test_zero_backoff_always_zero() {
        let mut b = ZeroBackoff;
        assert_eq!(take(&mut b, 4), vec![Duration::ZERO; 4]);
        b.reset();
        assert_eq!(take(&mut b, 4), vec![Duration::ZERO; 4]);
    }

    #[test]
    fn test_constant_backoff_ignores_reset() {
        let mut b1 = ConstantBackoff::new(Duration::from_secs(25));
        let mut b2 = ConstantBackoff::new(Duration::from_secs(50 * 60));

        assert_eq!(take(&mut b1, 4), vec![Duration::from_secs(25); 4]);
        b2.reset();
        assert_eq!(take(&mut b2, 4), vec![Duration::from_secs(3000); 4]);

        assert_eq!(take(&mut b1, 4), vec![Duration::from_secs(25); 4]);
        b1.reset();
        assert_eq!(take(&mut b1, 4), vec![Duration::from_secs(25); 4]);
    }

    #[test]
    fn test_boxed_backoff_forwards() {
        let mut b: Box<dyn Backoff> = Box::new(ConstantBackoff::new(Duration::from_millis(7)));
        assert_eq!(b.next_interval(), Duration::from_millis(7));
        b.reset();
        assert_eq!(b.next_interval(), Duration::from_millis(7));
    }
}
