//! # Event fan-out from one watcher to its subscribers.
//!
//! A [`SubscriberSet`] is created when a watcher with subscribers starts. It
//! listens on the watcher's bus and hands each event to one worker per
//! subscriber, until the watcher reports `WatcherStopped`.
//!
//! ```text
//! Bus ──► listen() ──► forward(event)
//!                          ├──► [queue 1] ──► worker 1 ──► on_event()
//!                          └──► [queue N] ──► worker N ──► on_event()
//!                                                 └─► panic → SubscriberPanicked
//! ```
//!
//! ## Rules
//! - `forward()` never waits: a full or closed queue drops the event for that
//!   subscriber only and publishes `SubscriberOverflow` (never for an overflow event).
//! - Each subscriber sees its events in publish order.
//! - A panicking `on_event` is caught; the worker keeps serving later events.
//!
//! **Warning**: panics are caught through `AssertUnwindSafe`; a subscriber holding
//! a lock while it panics may leave shared state inconsistent.

use std::sync::Arc;

use futures::FutureExt;
use tokio::{
    sync::{broadcast, mpsc},
    task::JoinHandle,
};

use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Queue feeding one subscriber's worker.
struct Lane {
    subscriber: &'static str,
    queue: mpsc::Sender<Arc<Event>>,
}

/// Per-watcher fan-out to subscriber workers.
pub(crate) struct SubscriberSet {
    lanes: Vec<Lane>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Spawns one worker per subscriber. Must be called within a tokio runtime.
    pub(crate) fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, workers) = subs
            .into_iter()
            .map(|sub| {
                let (queue, rx) = mpsc::channel(sub.queue_capacity().max(1));
                let lane = Lane {
                    subscriber: sub.name(),
                    queue,
                };
                (lane, tokio::spawn(serve(sub, rx, bus.clone())))
            })
            .unzip();

        Self {
            lanes,
            workers,
            bus,
        }
    }

    /// Hands `event` to every worker without waiting.
    fn forward(&self, event: Event) {
        let overflow_event = event.is_subscriber_overflow();
        let event = Arc::new(event);

        for lane in &self.lanes {
            let reason = match lane.queue.try_send(Arc::clone(&event)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !overflow_event {
                self.bus
                    .publish(Event::subscriber_overflow(lane.subscriber, reason));
            }
        }
    }

    /// Forwards events from `rx` until the watcher reports it has stopped,
    /// then waits for the workers to finish their queues.
    ///
    /// Lagged receivers skip the missed events and keep going.
    pub(crate) async fn listen(self, mut rx: broadcast::Receiver<Event>) {
        loop {
            match rx.recv().await {
                Ok(ev) => {
                    let last = ev.kind == EventKind::WatcherStopped;
                    self.forward(ev);
                    if last {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        self.drain().await;
    }

    /// Closes every queue and waits for the workers to exit.
    async fn drain(self) {
        let Self { lanes, workers, .. } = self;
        drop(lanes);
        futures::future::join_all(workers).await;
    }
}

/// Worker loop for a single subscriber.
async fn serve(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(ev) = rx.recv().await {
        let handled = std::panic::AssertUnwindSafe(sub.on_event(&ev))
            .catch_unwind()
            .await;
        if let Err(payload) = handled {
            bus.publish(Event::subscriber_panicked(
                sub.name(),
                panic_message(payload.as_ref()),
            ));
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&'static str>()
        .map(|msg| (*msg).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    const WAIT: Duration = Duration::from_secs(5);

    struct Recorder {
        seen: Arc<Mutex<Vec<EventKind>>>,
    }

    #[async_trait]
    impl Subscribe for Recorder {
        async fn on_event(&self, event: &Event) {
            self.seen.lock().await.push(event.kind);
        }

        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    struct Panicker;

    #[async_trait]
    impl Subscribe for Panicker {
        async fn on_event(&self, _event: &Event) {
            panic!("subscriber blew up");
        }

        fn name(&self) -> &'static str {
            "panicker"
        }
    }

    /// Holds every event until released, with a one-slot queue.
    struct Stalled {
        release: CancellationToken,
    }

    #[async_trait]
    impl Subscribe for Stalled {
        async fn on_event(&self, _event: &Event) {
            self.release.cancelled().await;
        }

        fn name(&self) -> &'static str {
            "stalled"
        }

        fn queue_capacity(&self) -> usize {
            1
        }
    }

    #[tokio::test]
    async fn test_listen_delivers_in_order_until_stopped() {
        let bus = Bus::new(16);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let set = SubscriberSet::new(
            vec![Arc::new(Recorder {
                seen: Arc::clone(&seen),
            })],
            bus.clone(),
        );
        let listener = tokio::spawn(set.listen(bus.subscribe()));

        bus.publish(Event::new(EventKind::WatcherStarted));
        bus.publish(Event::new(EventKind::ProbeFailed));
        bus.publish(Event::new(EventKind::WatcherStopped));
        bus.publish(Event::new(EventKind::CheckRequested));

        tokio::time::timeout(WAIT, listener)
            .await
            .expect("listener did not exit")
            .unwrap();
        assert_eq!(
            *seen.lock().await,
            vec![
                EventKind::WatcherStarted,
                EventKind::ProbeFailed,
                EventKind::WatcherStopped
            ]
        );
    }

    #[tokio::test]
    async fn test_panic_is_reported_on_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let set = SubscriberSet::new(vec![Arc::new(Panicker)], bus.clone());

        set.forward(Event::new(EventKind::WatcherStarted));

        let ev = tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("panic event not published")
            .unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberPanicked);
        assert_eq!(ev.subscriber, Some("panicker"));
        assert!(ev.watcher.is_none());
        assert_eq!(ev.reason.as_deref(), Some("subscriber blew up"));
        set.drain().await;
    }

    #[tokio::test]
    async fn test_full_queue_reports_overflow() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let release = CancellationToken::new();
        let set = SubscriberSet::new(
            vec![Arc::new(Stalled {
                release: release.clone(),
            })],
            bus.clone(),
        );

        // first event occupies the worker, second fills the queue
        set.forward(Event::new(EventKind::ProbeFailed));
        tokio::task::yield_now().await;
        set.forward(Event::new(EventKind::ProbeFailed));
        set.forward(Event::new(EventKind::ProbeFailed));

        let ev = tokio::time::timeout(WAIT, rx.recv())
            .await
            .expect("overflow event not published")
            .unwrap();
        assert_eq!(ev.kind, EventKind::SubscriberOverflow);
        assert_eq!(ev.subscriber, Some("stalled"));
        assert_eq!(ev.reason.as_deref(), Some("full"));

        release.cancel();
        set.drain().await;
    }
}
