//! # LogWriter: simple event printer
//!
//! A minimal subscriber that prints incoming [`Event`]s to stdout.
//! Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! [started] watcher="db-ready"
//! [probe-failed] watcher="db-ready" cycle=1 attempt=1
//! [backoff] watcher="db-ready" delay=12.5ms cycle=1 after_attempt=1
//! [probe-succeeded] watcher="db-ready" cycle=1 attempt=2
//! [check] watcher="db-ready"
//! [stop] watcher="db-ready"
//! [stopped] watcher="db-ready" reason="stopped"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let w = e.watcher.as_deref().unwrap_or("unknown");
        match e.kind {
            EventKind::WatcherStarted => println!("[started] watcher={w:?}"),
            EventKind::WatcherStopped => {
                println!(
                    "[stopped] watcher={w:?} reason={:?}",
                    e.reason.as_deref().unwrap_or("stopped")
                );
            }
            EventKind::ProbeFailed => {
                println!(
                    "[probe-failed] watcher={w:?} cycle={:?} attempt={:?}",
                    e.cycle, e.attempt
                );
            }
            EventKind::BackoffScheduled => {
                println!(
                    "[backoff] watcher={w:?} delay={:?} cycle={:?} after_attempt={:?}",
                    e.delay, e.cycle, e.attempt
                );
            }
            EventKind::ProbeSucceeded => {
                println!(
                    "[probe-succeeded] watcher={w:?} cycle={:?} attempt={:?}",
                    e.cycle, e.attempt
                );
            }
            EventKind::CheckRequested => println!("[check] watcher={w:?}"),
            EventKind::CheckIgnored => println!("[check-coalesced] watcher={w:?}"),
            EventKind::StopRequested => println!("[stop] watcher={w:?}"),
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked => {
                let tag = if e.is_subscriber_panic() {
                    "subscriber-panicked"
                } else {
                    "subscriber-overflow"
                };
                println!(
                    "[{tag}] subscriber={:?} reason={:?}",
                    e.subscriber.unwrap_or("unknown"),
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
