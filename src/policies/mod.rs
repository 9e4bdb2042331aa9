//! Backoff policies.
//!
//! This module groups the generators that decide **how long** a watcher waits
//! between failed probe attempts.
//!
//! ## Contents
//! - [`Backoff`] the stateful generator trait (`next_interval` / `reset`)
//! - [`ZeroBackoff`] no delay at all
//! - [`ConstantBackoff`] fixed delay
//! - [`ExponentialBackoff`] `min × multiplier^n` with proportional jitter, capped
//!
//! ## Quick wiring
//! ```text
//! Watcher { probe, backoff, clock }
//!      └─► core::actor::WatchActor uses:
//!           - backoff.reset() once, after a cycle's first failed probe
//!           - backoff.next_interval() before every timed wait
//! ```
//!
//! ## Defaults
//! - `ExponentialConfig::default()` → multiplier=1.25, rand_factor=0.25, min=10ms, max=10min.

mod backoff;
mod exponential;
mod jitter;

pub use backoff::{Backoff, ConstantBackoff, ZeroBackoff};
pub use exponential::{
    DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL, DEFAULT_MULTIPLIER, DEFAULT_RAND_FACTOR,
    ExponentialBackoff, ExponentialConfig,
};
