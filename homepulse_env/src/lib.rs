//! HomePulse Environment Abstraction Layer
//!
//! This crate provides the abstraction allowing the HomePulse engine to run
//! in both **Production** (tokio, wall clock, OS entropy) and **Simulation**
//! (virtual clock, seeded RNG) environments.
//!
//! # Core Concept
//!
//! The sensor waveform and the hazard probabilities are driven by two
//! sources of non-determinism: time and randomness. Both are intercepted
//! behind [`PulseContext`]:
//!
//! - Time (`now()`, `system_time()`, `sleep()`)
//! - Randomness (`random_unit()`, `random_range()`)
//!
//! By deriving all entropy from a single 64-bit seed in simulation, any
//! hazard sequence becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use homepulse_env::PulseContext;
//!
//! fn jittered_temperature<C: PulseContext>(ctx: &C, base: f64) -> f64 {
//!     base + ctx.random_range(-0.1, 0.1)
//! }
//! ```

mod context;
mod tokio_impl;

pub use context::PulseContext;
pub use tokio_impl::TokioContext;
