//! # Proportional jitter for retry delays.
//!
//! Spreads a computed delay uniformly over `[base × (1 − ratio), base × (1 + ratio)]`
//! so that many watchers retrying the same dependency do not wake up in lockstep.
//!
//! - `ratio = 0.0` returns the base unchanged (deterministic sequences for tests)
//! - `ratio = 0.25` lets a 100ms base land anywhere in `[75ms, 125ms]`

use rand::Rng;

/// Returns a value drawn uniformly from `[base × (1 − ratio), base × (1 + ratio)]`.
///
/// Works in nanoseconds as `f64`; the caller converts and clamps.
/// Ratios outside `[0, 1)` are clamped into range.
pub(crate) fn spread(base_nanos: f64, ratio: f64) -> f64 {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 0.999_999)
    } else {
        0.0
    };
    if ratio == 0.0 || base_nanos <= 0.0 {
        return base_nanos;
    }

    let lo = base_nanos - base_nanos * ratio;
    let hi = base_nanos + base_nanos * ratio;
    if lo >= hi {
        return base_nanos;
    }

    rand::rng().random_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ratio_is_identity() {
        for base in [0.0, 1.0, 1_000_000.0, 123_456_789.0] {
            assert_eq!(spread(base, 0.0), base);
        }
    }

    #[test]
    fn test_spread_stays_within_bounds() {
        let base = 8_000_000.0;
        for _ in 0..1000 {
            let v = spread(base, 0.25);
            assert!(v >= 6_000_000.0, "{v} below lower bound");
            assert!(v <= 10_000_000.0, "{v} above upper bound");
        }
    }

    #[test]
    fn test_invalid_ratio_is_clamped() {
        assert_eq!(spread(1_000.0, -1.0), 1_000.0);
        assert_eq!(spread(1_000.0, f64::NAN), 1_000.0);

        for _ in 0..100 {
            let v = spread(1_000.0, 5.0);
            assert!((0.0..=2_000.0).contains(&v));
        }
    }
}
