//! # WatchActor: the watcher's background state machine.
//!
//! One actor runs per started [`Watcher`](crate::Watcher). It owns the probe, the
//! backoff generator and the clock, and is driven by three signals:
//! `stop` (a [`CancellationToken`]), `check` (a capacity-1 queue) and the clock tick.
//!
//! ## States
//! ```text
//!                 start()
//!                    │
//!                    ▼
//!          ┌──► ProbingImmediate ──── probe() == true ────────────┐
//!          │         │                                            │
//!          │   probe() == false                                   │
//!          │   backoff.reset()                                    │
//!          │         ▼                                            ▼
//!          │   BackoffWaiting ◄──┐                       SucceededWaiting
//!          │     next_interval() │ probe() == false        absorb checks
//!          │     tick | stop ────┘                         send(Success), await ack
//!          │         │      └── probe() == true ──────────►  check | stop
//!          │         │                                            │
//!          └─────────┼──────────────── check ─────────────────────┘
//!                    │ stop                                       │ stop
//!                    ▼                                            ▼
//!                 Stopped ◄───────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Probe invocations are **strictly sequential**; none begins once `stop` is observed.
//! - `backoff.reset()` runs **once per cycle**, right after the cycle's first failure.
//! - Checks arriving during a cycle stay in the single-slot queue and are discarded
//!   when the cycle succeeds: they never shorten a wait, trigger a probe or reset the backoff.
//! - A success is delivered as a rendezvous: the actor waits until the caller has
//!   received it before it listens for checks, so an unread success holds back the
//!   next cycle.
//! - `stop` wins over any other branch that is ready at the same suspension point.
//! - Every exit publishes `WatcherStopped` and drops the success sender, closing the signal.

use std::sync::Arc;

use tokio::{
    select,
    sync::{mpsc, oneshot},
};
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    core::signal::{Delivery, Success},
    events::{Bus, Event, EventKind},
    policies::Backoff,
    probes::Probe,
};

/// Explicit watcher states (Idle lives on the handle, before the actor exists).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    ProbingImmediate,
    BackoffWaiting,
    SucceededWaiting,
    Stopped(Exit),
}

/// Why the actor left its loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exit {
    Stopped,
    ReceiverDropped,
}

impl Exit {
    fn as_reason(self) -> &'static str {
        match self {
            Exit::Stopped => "stopped",
            Exit::ReceiverDropped => "success receiver dropped",
        }
    }
}

/// Everything the background task owns.
pub(crate) struct WatchActor {
    name: Arc<str>,
    probe: Box<dyn Probe>,
    backoff: Box<dyn Backoff>,
    clock: Arc<dyn Clock>,
    bus: Bus,
    stop: CancellationToken,
    checks: mpsc::Receiver<()>,
    success: mpsc::Sender<Delivery>,
    cycle: u64,
    attempt: u64,
}

impl WatchActor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: Arc<str>,
        probe: Box<dyn Probe>,
        backoff: Box<dyn Backoff>,
        clock: Arc<dyn Clock>,
        bus: Bus,
        stop: CancellationToken,
        checks: mpsc::Receiver<()>,
        success: mpsc::Sender<Delivery>,
    ) -> Self {
        Self {
            name,
            probe,
            backoff,
            clock,
            bus,
            stop,
            checks,
            success,
            cycle: 0,
            attempt: 0,
        }
    }

    /// Runs cycles until stopped.
    pub async fn run(mut self) {
        self.publish(EventKind::WatcherStarted);

        let mut state = State::ProbingImmediate;
        let exit = loop {
            state = match state {
                State::ProbingImmediate => self.probe_immediate(),
                State::BackoffWaiting => self.backoff_wait().await,
                State::SucceededWaiting => self.deliver_and_wait().await,
                State::Stopped(exit) => break exit,
            };
        };

        self.bus.publish(
            Event::new(EventKind::WatcherStopped)
                .with_watcher(Arc::clone(&self.name))
                .with_cycle(self.cycle)
                .with_reason(exit.as_reason()),
        );
    }

    /// First attempt of a new cycle, outside any wait.
    fn probe_immediate(&mut self) -> State {
        if self.stop.is_cancelled() {
            return State::Stopped(Exit::Stopped);
        }
        self.cycle += 1;
        self.attempt = 0;

        if self.invoke() {
            return State::SucceededWaiting;
        }
        self.backoff.reset();
        State::BackoffWaiting
    }

    /// One timed wait followed by one attempt.
    async fn backoff_wait(&mut self) -> State {
        let delay = self.backoff.next_interval();
        self.bus.publish(
            Event::new(EventKind::BackoffScheduled)
                .with_watcher(Arc::clone(&self.name))
                .with_cycle(self.cycle)
                .with_attempt(self.attempt)
                .with_delay(delay),
        );

        let tick = self.clock.after(delay);
        select! {
            biased;
            _ = self.stop.cancelled() => return State::Stopped(Exit::Stopped),
            _ = tick => {}
        }
        if self.stop.is_cancelled() {
            return State::Stopped(Exit::Stopped);
        }

        if self.invoke() {
            State::SucceededWaiting
        } else {
            State::BackoffWaiting
        }
    }

    /// Hands the success over, waits until the caller has received it, then
    /// parks until the caller checks or stops.
    async fn deliver_and_wait(&mut self) -> State {
        self.absorb_checks();
        self.bus.publish(
            Event::new(EventKind::ProbeSucceeded)
                .with_watcher(Arc::clone(&self.name))
                .with_cycle(self.cycle)
                .with_attempt(self.attempt),
        );

        let success = Success {
            cycle: self.cycle,
            attempts: self.attempt,
        };
        let (ack_tx, ack_rx) = oneshot::channel();
        select! {
            biased;
            _ = self.stop.cancelled() => return State::Stopped(Exit::Stopped),
            sent = self.success.send((success, ack_tx)) => {
                if sent.is_err() {
                    return State::Stopped(Exit::ReceiverDropped);
                }
            }
        }

        // Dropping the signal with the success still queued drops the ack too.
        select! {
            biased;
            _ = self.stop.cancelled() => return State::Stopped(Exit::Stopped),
            acked = ack_rx => {
                if acked.is_err() {
                    return State::Stopped(Exit::ReceiverDropped);
                }
            }
        }

        // The handle cancels `stop` before its check queue closes.
        select! {
            biased;
            _ = self.stop.cancelled() => State::Stopped(Exit::Stopped),
            check = self.checks.recv() => match check {
                Some(()) => State::ProbingImmediate,
                None => State::Stopped(Exit::Stopped),
            },
        }
    }

    /// Invokes the probe once, counting the attempt.
    fn invoke(&mut self) -> bool {
        self.attempt += 1;
        let ok = self.probe.probe();
        if !ok {
            self.bus.publish(
                Event::new(EventKind::ProbeFailed)
                    .with_watcher(Arc::clone(&self.name))
                    .with_cycle(self.cycle)
                    .with_attempt(self.attempt),
            );
        }
        ok
    }

    /// Discards checks that arrived while the cycle was still running.
    fn absorb_checks(&mut self) {
        while self.checks.try_recv().is_ok() {}
    }

    fn publish(&self, kind: EventKind) {
        self.bus
            .publish(Event::new(kind).with_watcher(Arc::clone(&self.name)));
    }
}
