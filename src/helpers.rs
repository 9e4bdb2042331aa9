//! # Blocking helpers.
//!
//! One-shot wrappers around a transient [`Watcher`]: start it, wait for the first
//! success or for the caller to give up, and stop it before returning.
//!
//! ```text
//! helper(probe, backoff, limit)
//!   ├─► Watcher::new(probe, backoff).start()
//!   ├─► select { first success | limit reached }
//!   └─► watcher.stop()   (always, before returning)
//! ```
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use watchdog::{ProbeFn, WatchError, ZeroBackoff, block_until_success_or_timeout};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let never = ProbeFn::new("never", || false);
//!     let res = block_until_success_or_timeout(never, ZeroBackoff, Duration::from_millis(20)).await;
//!     assert!(matches!(res, Err(WatchError::Timeout { .. })));
//! }
//! ```

use std::time::Duration;

use tokio::select;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{Success, SuccessSignal, Watcher},
    error::WatchError,
    policies::Backoff,
    probes::Probe,
};

/// Waits until `probe` succeeds once.
///
/// Returns [`WatchError::Closed`] only if the watcher exits on its own, which
/// does not happen in normal operation.
pub async fn block_until_success(
    probe: impl Probe,
    backoff: impl Backoff,
) -> Result<Success, WatchError> {
    let mut watcher = Watcher::new(probe, backoff);
    let mut signal = watcher.start();
    let res = signal.recv().await.ok_or(WatchError::Closed);
    watcher.stop();
    res
}

/// Waits until `probe` succeeds or `timeout` elapses.
pub async fn block_until_success_or_timeout(
    probe: impl Probe,
    backoff: impl Backoff,
    timeout: Duration,
) -> Result<Success, WatchError> {
    let mut watcher = Watcher::new(probe, backoff);
    let mut signal = watcher.start();
    let res = match tokio::time::timeout(timeout, signal.recv()).await {
        Ok(first) => first.ok_or(WatchError::Closed),
        Err(_elapsed) => Err(WatchError::Timeout { timeout }),
    };
    watcher.stop();
    res
}

/// Waits until `probe` succeeds or `token` is cancelled.
///
/// An already-cancelled token returns [`WatchError::Canceled`] without
/// invoking the probe.
pub async fn block_until_success_or_cancel(
    probe: impl Probe,
    backoff: impl Backoff,
    token: CancellationToken,
) -> Result<Success, WatchError> {
    if token.is_cancelled() {
        return Err(WatchError::Canceled);
    }

    let mut watcher = Watcher::new(probe, backoff);
    let mut signal = watcher.start();
    let res = first_or_cancel(&mut signal, &token).await;
    watcher.stop();
    res
}

async fn first_or_cancel(
    signal: &mut SuccessSignal,
    token: &CancellationToken,
) -> Result<Success, WatchError> {
    select! {
        biased;
        _ = token.cancelled() => Err(WatchError::Canceled),
        first = signal.recv() => first.ok_or(WatchError::Closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering::SeqCst};

    use crate::{ProbeFn, ZeroBackoff};

    fn nth_succeeds(attempts: &Arc<AtomicUsize>, n: usize) -> impl Probe {
        let attempts = Arc::clone(attempts);
        ProbeFn::new("nth", move || attempts.fetch_add(1, SeqCst) + 1 == n)
    }

    #[tokio::test]
    async fn test_block_until_success() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let success = block_until_success(nth_succeeds(&attempts, 2500), ZeroBackoff)
            .await
            .unwrap();

        assert_eq!(success.attempts, 2500);
        assert_eq!(attempts.load(SeqCst), 2500);
    }

    #[tokio::test]
    async fn test_timeout_success() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let res = block_until_success_or_timeout(
            nth_succeeds(&attempts, 2500),
            ZeroBackoff,
            Duration::from_secs(30),
        )
        .await;

        assert!(res.is_ok());
        assert_eq!(attempts.load(SeqCst), 2500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_failure() {
        let res = block_until_success_or_timeout(
            ProbeFn::new("never", || false),
            crate::ConstantBackoff::new(Duration::from_millis(1)),
            Duration::from_millis(10),
        )
        .await;

        assert_eq!(
            res,
            Err(WatchError::Timeout {
                timeout: Duration::from_millis(10)
            })
        );
    }

    #[tokio::test]
    async fn test_cancel_success() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        let res =
            block_until_success_or_cancel(nth_succeeds(&attempts, 2500), ZeroBackoff, token).await;

        assert!(res.is_ok());
        assert_eq!(attempts.load(SeqCst), 2500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_failure() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            canceller.cancel();
        });

        let res = block_until_success_or_cancel(
            ProbeFn::new("never", || false),
            crate::ConstantBackoff::new(Duration::from_millis(1)),
            token,
        )
        .await;
        assert_eq!(res, Err(WatchError::Canceled));
    }

    #[tokio::test]
    async fn test_pre_cancelled_token_skips_probe() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let token = CancellationToken::new();
        token.cancel();

        let res =
            block_until_success_or_cancel(nth_succeeds(&attempts, 1), ZeroBackoff, token).await;
        assert_eq!(res, Err(WatchError::Canceled));
        assert_eq!(attempts.load(SeqCst), 0);
    }
}
