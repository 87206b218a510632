//! HomePulse deterministic simulation harness.
//!
//! Provides a [`SimContext`] where time and randomness derive from a single
//! 64-bit seed, so any hazard sequence the engine produces is reproducible
//! via its seed number, plus a [`LogSink`] that stands in for the push
//! endpoint during dry runs.

mod context;
mod sink;

pub use context::SimContext;
pub use sink::LogSink;
