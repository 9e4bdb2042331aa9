//! # Function-backed probe (`ProbeFn`)
//!
//! [`ProbeFn`] wraps a named closure `F: FnMut() -> bool`.
//!
//! ## Example
//! ```rust
//! use watchdog::{Probe, ProbeFn};
//!
//! let mut calls = 0;
//! let mut p = ProbeFn::new("third-time-lucky", move || {
//!     calls += 1;
//!     calls == 3
//! });
//!
//! assert_eq!(p.name(), "third-time-lucky");
//! assert!(!p.probe());
//! assert!(!p.probe());
//! assert!(p.probe());
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::probes::probe::Probe;

/// Function-backed probe implementation.
pub struct ProbeFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ProbeFn<F>
where
    F: FnMut() -> bool + Send + 'static,
{
    /// Creates a new function-backed probe.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> fmt::Debug for ProbeFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeFn").field("name", &self.name).finish()
    }
}

impl<F> Probe for ProbeFn<F>
where
    F: FnMut() -> bool + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&mut self) -> bool {
        (self.f)()
    }
}
