//! # Watcher: caller-facing handle of a retry coordinator.
//!
//! A [`Watcher`] invokes a [`Probe`] until it returns `true`, waiting between
//! attempts as dictated by a [`Backoff`] generator. After each success it parks
//! until the caller asks for a new cycle with [`Watcher::check`], and it exits for
//! good on [`Watcher::stop`].
//!
//! ## Lifecycle
//! ```text
//! Watcher::new(probe, backoff)        Idle       (nothing spawned)
//!     └─► start() ─► SuccessSignal    Running    (one WatchActor task)
//!            ├─► check()  ... new cycle after a success; absorbed otherwise
//!            └─► stop()               Stopped    (signal closes once the task exits)
//! ```
//!
//! ## Misuse
//! These are caller bugs and panic:
//! - `start()` on a watcher that was already started or stopped;
//! - `stop()` twice;
//! - `check()` after `stop()`.
//!
//! Dropping a watcher stops its background task.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{ConstantBackoff, ProbeFn, Watcher};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut tries = 0;
//!     let probe = ProbeFn::new("warming-up", move || {
//!         tries += 1;
//!         tries >= 3
//!     });
//!
//!     let mut watcher = Watcher::new(probe, ConstantBackoff::new(Duration::from_millis(1)));
//!     let mut signal = watcher.start();
//!
//!     let success = signal.recv().await.unwrap();
//!     assert_eq!(success.attempts, 3);
//!
//!     watcher.stop();
//!     assert!(signal.recv().await.is_none());
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    core::{
        Config,
        actor::WatchActor,
        builder::WatcherBuilder,
        signal::SuccessSignal,
    },
    events::{Bus, Event, EventKind},
    policies::Backoff,
    probes::Probe,
    subscribers::{Subscribe, SubscriberSet},
};

/// Collaborators held until the background task takes them over.
struct Pending {
    probe: Box<dyn Probe>,
    backoff: Box<dyn Backoff>,
    clock: Arc<dyn Clock>,
    checks: mpsc::Receiver<()>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

enum Phase {
    Idle(Box<Pending>),
    Running,
    Stopped,
}

impl Phase {
    fn label(&self) -> &'static str {
        match self {
            Phase::Idle(_) => "idle",
            Phase::Running => "running",
            Phase::Stopped => "stopped",
        }
    }
}

/// Retry coordinator for a single condition.
pub struct Watcher {
    name: Arc<str>,
    phase: Phase,
    bus: Bus,
    stop: CancellationToken,
    check_tx: mpsc::Sender<()>,
}

impl Watcher {
    /// Creates a watcher on the system clock with default configuration.
    ///
    /// Does not start the background task.
    pub fn new(probe: impl Probe, backoff: impl Backoff) -> Self {
        WatcherBuilder::new(probe, backoff).build()
    }

    /// Creates a watcher whose backoff is the exponential default from `cfg`.
    pub fn with_defaults(probe: impl Probe, cfg: &Config) -> Self {
        WatcherBuilder::new(probe, cfg.default_backoff())
            .with_config(cfg.clone())
            .build()
    }

    /// Returns a builder for a watcher with a custom clock, config or subscribers.
    pub fn builder(probe: impl Probe, backoff: impl Backoff) -> WatcherBuilder {
        WatcherBuilder::new(probe, backoff)
    }

    pub(crate) fn from_parts(
        probe: Box<dyn Probe>,
        backoff: Box<dyn Backoff>,
        clock: Arc<dyn Clock>,
        cfg: &Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Self {
        let (check_tx, checks) = mpsc::channel(1);
        Self {
            name: Arc::from(probe.name()),
            phase: Phase::Idle(Box::new(Pending {
                probe,
                backoff,
                clock,
                checks,
                subscribers,
            })),
            bus: Bus::new(cfg.bus_capacity_clamped()),
            stop: CancellationToken::new(),
            check_tx,
        }
    }

    /// Name of the watched probe.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, Phase::Stopped)
    }

    /// Creates a receiver for this watcher's events.
    ///
    /// Only events published after the call are observed.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Spawns the background task and returns the success signal.
    ///
    /// The first probe attempt happens immediately. Must be called within a
    /// tokio runtime.
    ///
    /// # Panics
    /// If the watcher was already started or stopped.
    pub fn start(&mut self) -> SuccessSignal {
        let pending = match std::mem::replace(&mut self.phase, Phase::Running) {
            Phase::Idle(pending) => pending,
            Phase::Running => panic!("watcher {:?}: start() called twice", self.name),
            Phase::Stopped => {
                self.phase = Phase::Stopped;
                panic!("watcher {:?}: start() called after stop()", self.name)
            }
        };
        let Pending {
            probe,
            backoff,
            clock,
            checks,
            subscribers,
        } = *pending;

        if !subscribers.is_empty() {
            let set = SubscriberSet::new(subscribers, self.bus.clone());
            tokio::spawn(set.listen(self.bus.subscribe()));
        }

        let (success_tx, success_rx) = mpsc::channel(1);
        let actor = WatchActor::new(
            Arc::clone(&self.name),
            probe,
            backoff,
            clock,
            self.bus.clone(),
            self.stop.clone(),
            checks,
            success_tx,
        );
        tokio::spawn(actor.run());

        SuccessSignal::new(success_rx)
    }

    /// Requests a new cycle after a success.
    ///
    /// Never blocks. While a cycle is still running (or before `start`), the
    /// request is absorbed: it does not shorten the current wait, does not
    /// trigger an extra probe, and repeated calls never queue more than one
    /// future cycle. After a success, the new cycle begins only once that
    /// success has been received from the [`SuccessSignal`].
    ///
    /// # Panics
    /// If called after [`stop`](Self::stop).
    pub fn check(&self) {
        if matches!(self.phase, Phase::Stopped) {
            panic!("watcher {:?}: check() called after stop()", self.name);
        }

        let kind = match self.check_tx.try_send(()) {
            Ok(()) => EventKind::CheckRequested,
            Err(mpsc::error::TrySendError::Full(())) => EventKind::CheckIgnored,
            // Background task already gone (success signal dropped).
            Err(mpsc::error::TrySendError::Closed(())) => return,
        };
        self.bus
            .publish(Event::new(kind).with_watcher(Arc::clone(&self.name)));
    }

    /// Stops the watcher permanently.
    ///
    /// No probe begins after the background task observes the stop; an attempt
    /// already in flight completes. The success signal closes once the task exits.
    ///
    /// # Panics
    /// If called twice.
    pub fn stop(&mut self) {
        if let Phase::Stopped = std::mem::replace(&mut self.phase, Phase::Stopped) {
            panic!("watcher {:?}: stop() called twice", self.name);
        }
        self.bus.publish(
            Event::new(EventKind::StopRequested).with_watcher(Arc::clone(&self.name)),
        );
        self.stop.cancel();
    }
}

impl Drop for Watcher {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("name", &self.name)
            .field("phase", &self.phase.label())
            .finish()
    }
}
