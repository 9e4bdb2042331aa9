//! Error types surfaced by the blocking helpers.
//!
//! The watcher itself has no error taxonomy: a probe either holds (`true`) or
//! it does not (`false`), and failures are retried until the watcher is stopped.
//! Misuse of the watcher API (starting twice, stopping twice, checking after
//! stop) is a caller bug and panics.
//!
//! [`WatchError`] covers the outcomes of the one-shot helpers such as
//! [`crate::block_until_success_or_timeout`], which race a watcher against a
//! timeout or a cancellation token.

use std::time::Duration;
use thiserror::Error;

/// # Errors returned while waiting for a probe to succeed.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WatchError {
    /// The timeout elapsed before the probe succeeded.
    #[error("timed out after {timeout:?} waiting for probe")]
    Timeout {
        /// The timeout that was exceeded.
        timeout: Duration,
    },

    /// The caller's cancellation token fired before the probe succeeded.
    #[error("wait cancelled")]
    Canceled,

    /// The watcher exited without reporting a success.
    #[error("watcher closed before the probe succeeded")]
    Closed,
}

impl WatchError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use watchdog::WatchError;
    /// use std::time::Duration;
    ///
    /// let err = WatchError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "watch_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WatchError::Timeout { .. } => "watch_timeout",
            WatchError::Canceled => "watch_canceled",
            WatchError::Closed => "watch_closed",
        }
    }

    /// Returns `true` if the wait was abandoned by the caller (timeout or cancellation)
    /// rather than by the watcher.
    pub fn is_caller_abort(&self) -> bool {
        matches!(self, WatchError::Timeout { .. } | WatchError::Canceled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(WatchError::Canceled.as_label(), "watch_canceled");
        assert_eq!(WatchError::Closed.as_label(), "watch_closed");
    }

    #[test]
    fn test_display() {
        let err = WatchError::Timeout {
            timeout: Duration::from_millis(10),
        };
        assert_eq!(err.to_string(), "timed out after 10ms waiting for probe");
        assert!(err.is_caller_abort());
        assert!(!WatchError::Closed.is_caller_abort());
    }
}
