//! Core environment context trait for the HomePulse engine.

use async_trait::async_trait;
use std::time::{Duration, SystemTime};

/// The central interface for environment interaction.
///
/// This trait abstracts the "real world" so that the simulation engine can
/// run in both production and deterministic-test environments.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `Instant`, `SystemTime::now`, `ThreadRng`
/// - **Simulation**: `SimContext` (harness crate) - virtual clock, `ChaCha8Rng(seed)`
///
/// # Determinism
///
/// All methods that would normally introduce non-determinism (time,
/// randomness) are controlled by the implementation. The engine never
/// touches the system clock or an RNG directly.
#[async_trait]
pub trait PulseContext: Send + Sync + 'static {
    /// Returns the current monotonic time since context creation.
    ///
    /// Used for the notification cooldown windows.
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Returns the wall-clock time.
    ///
    /// Drives the waveform phase of the autonomous reading model and the
    /// `HH:MM:SS` history timestamps. In simulation, this is derived from
    /// virtual clock + epoch offset.
    fn system_time(&self) -> SystemTime;

    /// Suspends execution for the given duration.
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns a uniform sample from `[0, 1)`.
    ///
    /// The reading model uses this for its probabilistic gates (gas spike,
    /// motion events), so a scripted implementation can force or suppress
    /// hazards in tests.
    fn random_unit(&self) -> f64;

    /// Returns a uniform sample from `[low, high)`.
    ///
    /// Used for bounded jitter on the waveform channels.
    fn random_range(&self, low: f64, high: f64) -> f64;

    /// Returns the context's seed (for logging/debugging).
    ///
    /// In production, returns 0 (not seeded).
    /// In simulation, returns the master seed.
    fn seed(&self) -> u64;
}
