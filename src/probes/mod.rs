//! # Probe abstractions.
//!
//! - [`Probe`] - trait for synchronous boolean checks
//! - [`ProbeFn`] - closure-backed implementation

mod probe;
mod probe_fn;

pub use probe::Probe;
pub use probe_fn::ProbeFn;
