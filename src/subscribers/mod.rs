//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the internal `SubscriberSet` fan-out
//! used to deliver watcher events to user code.
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   WatchActor ── publish(Event) ──► Bus ──► SubscriberSet::forward
//!                                                      │
//!                                            ┌─────────┼─────────┐
//!                                            ▼         ▼         ▼
//!                                        LogWriter  Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub(crate) use subscriber_set::SubscriberSet;
