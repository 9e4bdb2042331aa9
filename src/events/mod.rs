//! Runtime events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by watchers and subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Watcher` (check/stop requests), `WatchActor` (cycle and
//!   lifecycle events), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: `Watcher::subscribe()` receivers and the subscriber
//!   listener spawned by `WatcherBuilder::with_subscribers`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
