//! Watcher core: handle, state machine and configuration.
//!
//! The public API from this module is [`Watcher`] (plus its builder, config and
//! success signal). The state machine itself lives in the private actor.
//!
//! Internal modules:
//! - [`watcher`]: caller-facing handle (start/check/stop, misuse detection);
//! - [`actor`]: background task running cycles, waits and success delivery;
//! - [`signal`]: success channel returned by `start`;
//! - [`builder`]: optional collaborators (clock, config, subscribers);
//! - [`config`]: shared settings and default backoff.

mod actor;
mod builder;
mod config;
mod signal;
mod watcher;

pub use builder::WatcherBuilder;
pub use config::Config;
pub use signal::{Success, SuccessSignal};
pub use watcher::Watcher;
