//! # Manually driven clock for deterministic tests.
//!
//! [`MockClock`] keeps a virtual `now` that only moves when the test calls
//! [`advance`](MockClock::advance) or [`blocking_advance`](MockClock::blocking_advance).
//! Every tick it hands out is registered with a deadline of `now + duration` and
//! fires on the first advance that reaches it. Zero-length ticks also wait for an
//! advance, so a watcher driven by a zero backoff still makes exactly one attempt
//! per advance.
//!
//! ```text
//! watcher task                     test
//!   clock.after(d) ──► pending ◄── blocking_advance(1s)
//!        │                            │ (waits until a tick is pending)
//!        ▼                            ▼
//!   tick fires  ◄──────────────── now += 1s, fire deadlines <= now
//! ```

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{Notify, oneshot};

use super::{Clock, Tick};

struct Timer {
    deadline: Duration,
    fire: oneshot::Sender<()>,
}

#[derive(Default)]
struct State {
    now: Duration,
    timers: Vec<Timer>,
    after_args: Vec<Duration>,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    registered: Notify,
}

/// Virtual clock advanced explicitly by tests.
///
/// Cheap to clone; clones share the same virtual time.
#[derive(Clone, Default)]
pub struct MockClock {
    shared: Arc<Shared>,
}

impl MockClock {
    /// Creates a clock at virtual time zero with no pending ticks.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current virtual time since the clock was created.
    pub fn now(&self) -> Duration {
        self.state().now
    }

    /// Every duration passed to [`Clock::after`], in call order.
    pub fn after_args(&self) -> Vec<Duration> {
        self.state().after_args.clone()
    }

    /// Number of ticks registered, not yet fired, and still awaited by someone.
    pub fn pending(&self) -> usize {
        let mut state = self.state();
        state.timers.retain(|t| !t.fire.is_closed());
        state.timers.len()
    }

    /// Moves virtual time forward by `by` and fires every tick whose deadline is reached.
    pub fn advance(&self, by: Duration) {
        let mut state = self.state();
        state.now += by;
        let now = state.now;

        let (due, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut state.timers)
            .into_iter()
            .partition(|t| t.deadline <= now);
        state.timers = rest;
        drop(state);

        for timer in due {
            let _ = timer.fire.send(());
        }
    }

    /// Waits until at least one tick is pending, then [`advance`](Self::advance)s.
    pub async fn blocking_advance(&self, by: Duration) {
        loop {
            let registered = self.shared.registered.notified();
            if self.pending() > 0 {
                break;
            }
            registered.await;
        }
        self.advance(by);
    }
}

impl Clock for MockClock {
    fn after(&self, duration: Duration) -> Tick {
        let (tx, rx) = oneshot::channel();
        {
            let mut state = self.state();
            let deadline = state.now.saturating_add(duration);
            state.after_args.push(duration);
            state.timers.push(Timer { deadline, fire: tx });
        }
        self.shared.registered.notify_waiters();

        Box::pin(async move {
            if rx.await.is_err() {
                // Clock dropped with this tick pending: never fire.
                std::future::pending::<()>().await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_tick_fires_only_after_deadline() {
        let clock = MockClock::new();
        let mut tick = clock.after(Duration::from_secs(2));

        assert!((&mut tick).now_or_never().is_none());
        clock.advance(Duration::from_secs(1));
        assert!((&mut tick).now_or_never().is_none());
        clock.advance(Duration::from_secs(1));
        assert!(tick.now_or_never().is_some());
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_tick_waits_for_advance() {
        let clock = MockClock::new();
        let mut tick = clock.after(Duration::ZERO);

        assert_eq!(clock.pending(), 1);
        assert!((&mut tick).now_or_never().is_none());
        clock.advance(Duration::ZERO);
        assert!(tick.now_or_never().is_some());
        assert_eq!(clock.pending(), 0);
    }

    #[test]
    fn test_records_after_args() {
        let clock = MockClock::new();
        let _a = clock.after(Duration::from_millis(5));
        let _b = clock.after(Duration::from_millis(10));
        assert_eq!(
            clock.after_args(),
            vec![Duration::from_millis(5), Duration::from_millis(10)]
        );
    }

    #[tokio::test]
    async fn test_blocking_advance_waits_for_registration() {
        let clock = MockClock::new();
        let driver = clock.clone();

        let advancer = tokio::spawn(async move {
            driver.blocking_advance(Duration::from_secs(1)).await;
        });
        tokio::task::yield_now().await;
        assert_eq!(clock.now(), Duration::ZERO);

        let tick = clock.after(Duration::from_secs(1));
        tokio::time::timeout(Duration::from_secs(5), tick)
            .await
            .expect("tick never fired");
        advancer.await.unwrap();
        assert_eq!(clock.now(), Duration::from_secs(1));
    }
}
