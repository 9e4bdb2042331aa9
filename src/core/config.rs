//! # Watcher configuration.
//!
//! Provides [`Config`] centralized settings shared by watchers.
//!
//! Config is used in two ways:
//! 1. **Watcher creation**: `Watcher::builder(probe, backoff).with_config(cfg)`
//! 2. **Backoff defaults**: `Watcher::with_defaults(probe, &cfg)`
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus

use crate::policies::{ExponentialBackoff, ExponentialConfig};

/// Settings shared by watchers.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `backoff`: Parameters of the default exponential backoff
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Receivers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,

    /// Default backoff parameters.
    ///
    /// Used by `Watcher::with_defaults()`.
    pub backoff: ExponentialConfig,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Builds a fresh generator from [`Config::backoff`].
    pub fn default_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(self.backoff)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `backoff = ExponentialConfig::default()`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            backoff: ExponentialConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bus_capacity_clamped() {
        let cfg = Config {
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(Config::default().bus_capacity_clamped(), 1024);
    }

    #[test]
    fn test_default_backoff_uses_config() {
        let cfg = Config::default();
        assert_eq!(cfg.default_backoff().config(), &ExponentialConfig::default());
    }
}
