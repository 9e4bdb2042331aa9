//! # watchdog
//!
//! **watchdog** is a small retry coordinator for tokio applications.
//!
//! It repeatedly invokes a caller-supplied probe until it reports success, pausing
//! between attempts according to a pluggable backoff generator. Callers can ask
//! for a fresh cycle after a success, or halt the watcher for good. It is meant to
//! sit underneath anything that must wait for an external condition (a dependency
//! becoming reachable, a resource becoming available) without busy-looping.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   caller                                   background task (one per watcher)
//! ┌─────────────┐   start()   ┌──────────────────────────────────────────────┐
//! │   Watcher   │ ──────────► │ WatchActor                                   │
//! │  (handle)   │             │  - Probe    (probe() -> bool)                │
//! │             │  check()    │  - Backoff  (next_interval / reset)          │
//! │             │ ──[slot]──► │  - Clock    (after(d) -> Tick)               │
//! │             │  stop()     │                                              │
//! │             │ ──[token]─► │  Idle → ProbingImmediate → BackoffWaiting    │
//! └─────────────┘             │          ▲          │            │           │
//!        ▲                    │          └ check ─ SucceededWaiting          │
//!        │  SuccessSignal     │                         │                    │
//!        └────────────────────┼──── Success ◄───────────┘                    │
//!                             └──────────────┬───────────────────────────────┘
//!                                            │ publish(Event)
//!                                            ▼
//!                               Bus (broadcast) ──► SubscriberSet ──► LogWriter, ...
//! ```
//!
//! ### Cycle
//! ```text
//! loop {
//!   ├─► probe()  ── true ─────────────────────────────┐
//!   │     └─ false ─► backoff.reset()                  │
//!   │                 loop {                           │
//!   │                   ├─► delay = next_interval()    │
//!   │                   ├─► wait(clock.after(delay) | stop)
//!   │                   └─► probe() ── true ───────────┤
//!   │                 }                                ▼
//!   │                              send(Success), await receipt | stop
//!   └──────────────────────── check ◄──────── wait(check | stop)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                          |
//! |-------------------|--------------------------------------------------------------|---------------------------------------------|
//! | **Watcher**       | Start/check/stop a retry coordinator, receive successes.    | [`Watcher`], [`SuccessSignal`]              |
//! | **Policies**      | Delay generators between attempts.                           | [`Backoff`], [`ExponentialBackoff`]         |
//! | **Probes**        | The condition being awaited.                                 | [`Probe`], [`ProbeFn`]                      |
//! | **Time**          | Injected time source.                                        | [`Clock`], [`SystemClock`]                  |
//! | **Events**        | Lifecycle events and subscriber fan-out.                     | [`Event`], [`Subscribe`]                    |
//! | **Helpers**       | One-shot waits with timeout or cancellation.                 | [`block_until_success_or_timeout`]          |
//! | **Configuration** | Bus capacity and default backoff.                            | [`Config`]                                  |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//! - `test-util`: exports `MockClock`, a manually advanced clock for deterministic tests.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{ExponentialBackoff, ExponentialConfig, ProbeFn, Watcher};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut calls = 0;
//!     let probe = ProbeFn::new("dependency-up", move || {
//!         calls += 1;
//!         calls > 2
//!     });
//!     let backoff = ExponentialBackoff::new(ExponentialConfig {
//!         min_interval: Duration::from_millis(1),
//!         max_interval: Duration::from_millis(50),
//!         ..ExponentialConfig::default()
//!     });
//!
//!     let mut watcher = Watcher::new(probe, backoff);
//!     let mut signal = watcher.start();
//!
//!     let first = signal.recv().await.unwrap();
//!     assert_eq!(first.attempts, 3);
//!
//!     watcher.stop();
//! }
//! ```
mod clock;
mod core;
mod error;
mod events;
mod helpers;
mod policies;
mod probes;
mod subscribers;

// ---- Public re-exports ----

pub use clock::{Clock, SystemClock, Tick};
pub use core::{Config, Success, SuccessSignal, Watcher, WatcherBuilder};
pub use error::WatchError;
pub use events::{Bus, Event, EventKind};
pub use helpers::{block_until_success, block_until_success_or_cancel, block_until_success_or_timeout};
pub use policies::{
    Backoff, ConstantBackoff, DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL, DEFAULT_MULTIPLIER,
    DEFAULT_RAND_FACTOR, ExponentialBackoff, ExponentialConfig, ZeroBackoff,
};
pub use probes::{Probe, ProbeFn};
pub use subscribers::Subscribe;

// Optional: expose the manually driven clock for downstream tests.
// Enable with: `--features test-util`
#[cfg(any(test, feature = "test-util"))]
pub use clock::MockClock;

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
