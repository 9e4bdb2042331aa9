//! # Probe abstraction.
//!
//! A [`Probe`] answers one question: does the awaited condition hold **now**?
//! The watcher calls it from its background task, waits for the answer, and
//! decides whether to report success or schedule another attempt.
//!
//! Probes carry no retry, timeout or concurrency semantics of their own. A single
//! invocation should be quick and safe to repeat.
//!
//! # Example
//! ```
//! use watchdog::Probe;
//!
//! struct PortOpen {
//!     tries: u32,
//! }
//!
//! impl Probe for PortOpen {
//!     fn name(&self) -> &str { "port-open" }
//!
//!     fn probe(&mut self) -> bool {
//!         self.tries += 1;
//!         self.tries >= 3
//!     }
//! }
//! ```

/// # Synchronous boolean check.
///
/// The watcher owns its probe exclusively while running, so [`probe`](Probe::probe)
/// takes `&mut self` and may keep private state between calls.
pub trait Probe: Send + 'static {
    /// Returns a stable, human-readable name used in events.
    fn name(&self) -> &str;

    /// Returns `true` once the awaited condition holds.
    fn probe(&mut self) -> bool;
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn probe(&mut self) -> bool {
        (**self).probe()
    }
}
