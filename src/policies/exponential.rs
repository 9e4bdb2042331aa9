//! # Exponential backoff with proportional jitter.
//!
//! [`ExponentialBackoff`] keeps an attempt counter `n`. Every call increments `n`
//! first, then computes:
//!
//! ```text
//! base     = min_interval × multiplier^n
//! interval = uniform[base × (1 − rand_factor), base × (1 + rand_factor)]
//! result   = min(interval, max_interval)
//! ```
//!
//! The first call therefore already applies one multiplier step. A `rand_factor`
//! of zero makes the sequence deterministic.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{Backoff, ExponentialBackoff, ExponentialConfig};
//!
//! let mut backoff = ExponentialBackoff::new(ExponentialConfig {
//!     multiplier: 2.0,
//!     rand_factor: 0.0,
//!     min_interval: Duration::from_millis(1),
//!     max_interval: Duration::from_millis(4),
//! });
//!
//! assert_eq!(backoff.next_interval(), Duration::from_millis(2));
//! assert_eq!(backoff.next_interval(), Duration::from_millis(4));
//! assert_eq!(backoff.next_interval(), Duration::from_millis(4)); // capped
//!
//! backoff.reset();
//! assert_eq!(backoff.next_interval(), Duration::from_millis(2));
//! ```

use std::time::Duration;

use crate::policies::backoff::Backoff;
use crate::policies::jitter;

/// Default growth factor.
pub const DEFAULT_MULTIPLIER: f64 = 1.25;
/// Default jitter ratio.
pub const DEFAULT_RAND_FACTOR: f64 = 0.25;
/// Default base interval.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(10);
/// Default delay cap.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Parameters of an [`ExponentialBackoff`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialConfig {
    /// Multiplicative growth factor (`> 1.0` for growing delays).
    pub multiplier: f64,
    /// Jitter ratio in `[0, 1)`; `0.0` disables randomization.
    pub rand_factor: f64,
    /// Base interval the multiplier is applied to.
    pub min_interval: Duration,
    /// Hard cap on any returned delay.
    pub max_interval: Duration,
}

impl Default for ExponentialConfig {
    /// Returns:
    /// - `multiplier = 1.25`;
    /// - `rand_factor = 0.25`;
    /// - `min_interval = 10ms`;
    /// - `max_interval = 10min`.
    fn default() -> Self {
        Self {
            multiplier: DEFAULT_MULTIPLIER,
            rand_factor: DEFAULT_RAND_FACTOR,
            min_interval: DEFAULT_MIN_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
        }
    }
}

/// Exponentially growing, jittered, capped delays.
#[derive(Clone, Debug)]
pub struct ExponentialBackoff {
    attempts: u32,
    config: ExponentialConfig,
}

impl ExponentialBackoff {
    /// Creates a generator at the start of its sequence.
    pub fn new(config: ExponentialConfig) -> Self {
        Self {
            attempts: 0,
            config,
        }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &ExponentialConfig {
        &self.config
    }

    /// Unjittered base for attempt `n`, in nanoseconds; `None` when it
    /// overflows or is not a usable number.
    fn base_nanos(&self, n: u32) -> Option<f64> {
        let exp = n.min(i32::MAX as u32) as i32;
        let nanos = self.config.min_interval.as_nanos() as f64 * self.config.multiplier.powi(exp);
        (nanos.is_finite() && nanos >= 0.0).then_some(nanos)
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(ExponentialConfig::default())
    }
}

impl Backoff for ExponentialBackoff {
    fn next_interval(&mut self) -> Duration {
        self.attempts = self.attempts.saturating_add(1);

        let max = self.config.max_interval;
        let Some(base) = self.base_nanos(self.attempts) else {
            return max;
        };

        let nanos = jitter::spread(base, self.config.rand_factor).round();
        if nanos >= max.as_nanos() as f64 {
            return max;
        }
        Duration::from_nanos(nanos as u64)
    }

    fn reset(&mut self) {
        self.attempts = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(max: Duration, rand_factor: f64) -> ExponentialConfig {
        ExponentialConfig {
            multiplier: 2.0,
            rand_factor,
            min_interval: Duration::from_millis(1),
            max_interval: max,
        }
    }

    fn millis(b: &mut ExponentialBackoff, n: usize) -> Vec<u64> {
        (0..n).map(|_| b.next_interval().as_millis() as u64).collect()
    }

    #[test]
    fn test_non_random_sequence() {
        let mut b = ExponentialBackoff::new(config(Duration::from_secs(60), 0.0));

        assert_eq!(millis(&mut b, 6), vec![2, 4, 8, 16, 32, 64]);
        b.reset();
        assert_eq!(millis(&mut b, 6), vec![2, 4, 8, 16, 32, 64]);
    }

    #[test]
    fn test_non_random_is_exact() {
        let mut b = ExponentialBackoff::new(config(Duration::from_secs(60), 0.0));
        assert_eq!(b.next_interval(), Duration::from_millis(2));
        assert_eq!(b.next_interval(), Duration::from_millis(4));
        assert_eq!(b.next_interval(), Duration::from_millis(8));
    }

    #[test]
    fn test_clamped_to_max() {
        let mut b = ExponentialBackoff::new(config(Duration::from_millis(4), 0.0));

        assert_eq!(millis(&mut b, 6), vec![2, 4, 4, 4, 4, 4]);
        b.reset();
        assert_eq!(millis(&mut b, 6), vec![2, 4, 4, 4, 4, 4]);
    }

    #[test]
    fn test_randomized_within_ratio() {
        let mut b = ExponentialBackoff::new(config(Duration::from_secs(60), 0.25));

        for round in 0..2 {
            for n in 1..=6u32 {
                let base = 2f64.powi(n as i32);
                let got = b.next_interval().as_secs_f64() * 1_000.0;
                assert!(
                    got >= base * 0.75 - 1e-6 && got <= base * 1.25 + 1e-6,
                    "round {round} attempt {n}: {got}ms outside [{}, {}]",
                    base * 0.75,
                    base * 1.25
                );
            }
            b.reset();
        }
    }

    #[test]
    fn test_randomized_never_exceeds_max() {
        let mut b = ExponentialBackoff::new(config(Duration::from_millis(5), 0.25));
        for _ in 0..200 {
            assert!(b.next_interval() <= Duration::from_millis(5));
        }
    }

    #[test]
    fn test_huge_attempt_count_clamps_to_max() {
        let mut b = ExponentialBackoff::new(config(Duration::from_secs(10), 0.0));
        for _ in 0..2_000 {
            b.next_interval();
        }
        assert_eq!(b.next_interval(), Duration::from_secs(10));
    }

    #[test]
    fn test_defaults() {
        let cfg = ExponentialConfig::default();
        assert_eq!(cfg.multiplier, 1.25);
        assert_eq!(cfg.rand_factor, 0.25);
        assert_eq!(cfg.min_interval, Duration::from_millis(10));
        assert_eq!(cfg.max_interval, Duration::from_secs(600));
    }
}
