use std::sync::Arc;

use crate::{
    clock::{Clock, SystemClock},
    core::{Config, watcher::Watcher},
    policies::Backoff,
    probes::Probe,
    subscribers::Subscribe,
};

/// Builder for constructing a [`Watcher`] with optional collaborators.
pub struct WatcherBuilder {
    probe: Box<dyn Probe>,
    backoff: Box<dyn Backoff>,
    clock: Arc<dyn Clock>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl WatcherBuilder {
    /// Creates a builder with the system clock and default configuration.
    pub fn new(probe: impl Probe, backoff: impl Backoff) -> Self {
        Self {
            probe: Box::new(probe),
            backoff: Box::new(backoff),
            clock: Arc::new(SystemClock),
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the time source (e.g. a `MockClock` in tests).
    pub fn with_clock(mut self, clock: impl Clock) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive watcher events through dedicated workers with
    /// bounded queues, spawned when the watcher starts.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the watcher. Nothing is spawned until [`Watcher::start`].
    pub fn build(self) -> Watcher {
        Watcher::from_parts(
            self.probe,
            self.backoff,
            self.clock,
            &self.cfg,
            self.subscribers,
        )
    }
}
