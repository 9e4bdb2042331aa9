//! # Success signal returned by `Watcher::start`.
//!
//! [`SuccessSignal`] yields one [`Success`] per successful cycle and reports
//! closure (`None`) once the watcher's background task has exited.
//!
//! Delivery is a rendezvous: each success travels with an acknowledgement that
//! fires when the caller receives it. The watcher does not wait for a check (and
//! so cannot start the next cycle) until the current success has been received.
//!
//! ```text
//! WatchActor ── (Success, ack) ──► [slot] ──► recv() ── ack.send(()) ──┐
//!     ▲                                                                │
//!     └──── wait(ack | stop) ◄─────────────────────────────────────────┘
//! ```

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::{mpsc, oneshot};

/// Outcome of one successful cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Success {
    /// Cycle number, starting from 1.
    pub cycle: u64,
    /// Probe invocations the cycle took (1 = first try succeeded).
    pub attempts: u64,
}

/// A success waiting to be received, with the acknowledgement the watcher parks on.
pub(crate) type Delivery = (Success, oneshot::Sender<()>);

/// Receiving half of a watcher's success channel.
#[derive(Debug)]
pub struct SuccessSignal {
    rx: mpsc::Receiver<Delivery>,
}

impl SuccessSignal {
    pub(crate) fn new(rx: mpsc::Receiver<Delivery>) -> Self {
        Self { rx }
    }

    fn accept((success, ack): Delivery) -> Success {
        // The watcher may have stopped meanwhile.
        let _ = ack.send(());
        success
    }

    /// Waits for the next success.
    ///
    /// Returns `None` once the watcher has stopped and every delivered
    /// success has been received.
    pub async fn recv(&mut self) -> Option<Success> {
        self.rx.recv().await.map(Self::accept)
    }

    /// Returns `true` once the watcher's background task has exited.
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed()
    }
}

impl Stream for SuccessSignal {
    type Item = Success;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Success>> {
        self.rx.poll_recv(cx).map(|item| item.map(Self::accept))
    }
}
