//! # Runtime events emitted by watchers.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Lifecycle events**: watcher start and stop
//! - **Cycle events**: probe outcomes and scheduled waits
//! - **Control events**: check/stop requests coming from the caller
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! watcher name, cycle/attempt numbers and backoff delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::BackoffScheduled)
//!     .with_watcher("db-ready")
//!     .with_cycle(1)
//!     .with_attempt(3)
//!     .with_delay(Duration::from_millis(250));
//!
//! assert_eq!(ev.kind, EventKind::BackoffScheduled);
//! assert_eq!(ev.watcher.as_deref(), Some("db-ready"));
//! assert_eq!(ev.delay, Some(Duration::from_millis(250)));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Lifecycle events ===
    /// Background task spawned by `Watcher::start`.
    ///
    /// Sets:
    /// - `watcher`: watcher name
    WatcherStarted,

    /// Background task exited; the success signal is closed.
    ///
    /// Sets:
    /// - `watcher`: watcher name
    /// - `cycle`: last cycle number (0 if none ran)
    /// - `reason`: why it exited ("stopped", "receiver dropped")
    WatcherStopped,

    // === Cycle events ===
    /// Probe returned `false`.
    ///
    /// Sets:
    /// - `watcher`, `cycle`, `attempt` (1-based within the cycle)
    ProbeFailed,

    /// A timed wait is about to start.
    ///
    /// Sets:
    /// - `watcher`, `cycle`
    /// - `attempt`: the failed attempt this wait follows
    /// - `delay`: interval returned by the backoff generator
    BackoffScheduled,

    /// Probe returned `true`; a success is being delivered.
    ///
    /// Sets:
    /// - `watcher`, `cycle`, `attempt`
    ProbeSucceeded,

    // === Control events ===
    /// `Watcher::check` queued a new cycle request.
    ///
    /// Sets:
    /// - `watcher`
    CheckRequested,

    /// `Watcher::check` found a request already pending and coalesced into it.
    ///
    /// Sets:
    /// - `watcher`
    CheckIgnored,

    /// `Watcher::stop` was called.
    ///
    /// Sets:
    /// - `watcher`
    StopRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the watcher, if applicable.
    pub watcher: Option<Arc<str>>,
    /// Name of the subscriber an overflow or panic event refers to.
    pub subscriber: Option<&'static str>,
    /// Cycle number (starting from 1).
    pub cycle: Option<u64>,
    /// Probe attempt within the cycle (starting from 1).
    pub attempt: Option<u64>,
    /// Backoff delay before the next attempt.
    pub delay: Option<Duration>,
    /// Human-readable reason (exit cause, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            watcher: None,
            subscriber: None,
            cycle: None,
            attempt: None,
            delay: None,
            reason: None,
        }
    }

    /// Attaches a watcher name.
    #[inline]
    pub fn with_watcher(mut self, name: impl Into<Arc<str>>) -> Self {
        self.watcher = Some(name.into());
        self
    }

    /// Attaches the name of the subscriber the event refers to.
    #[inline]
    pub fn with_subscriber(mut self, name: &'static str) -> Self {
        self.subscriber = Some(name);
        self
    }

    /// Attaches a cycle number.
    #[inline]
    pub fn with_cycle(mut self, n: u64) -> Self {
        self.cycle = Some(n);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u64) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches a backoff delay.
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_subscriber(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_subscriber(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_subscriber_panic(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberPanicked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let a = Event::new(EventKind::WatcherStarted);
        let b = Event::new(EventKind::WatcherStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::ProbeFailed)
            .with_watcher("w")
            .with_cycle(2)
            .with_attempt(7)
            .with_reason("nope");

        assert_eq!(ev.watcher.as_deref(), Some("w"));
        assert_eq!(ev.cycle, Some(2));
        assert_eq!(ev.attempt, Some(7));
        assert_eq!(ev.reason.as_deref(), Some("nope"));
        assert!(ev.delay.is_none());
    }

    #[test]
    fn test_subscriber_helpers() {
        let ev = Event::subscriber_overflow("metrics", "full");
        assert!(ev.is_subscriber_overflow());
        assert_eq!(ev.subscriber, Some("metrics"));
        assert_eq!(ev.reason.as_deref(), Some("full"));
        assert!(ev.watcher.is_none());

        let ev = Event::subscriber_panicked("metrics", "boom".into());
        assert!(ev.is_subscriber_panic());
        assert_eq!(ev.subscriber, Some("metrics"));
        assert!(ev.watcher.is_none());
    }
}
