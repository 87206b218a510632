//! The simulation engine: tick orchestration and shared state.
//!
//! One `tick` advances the reading model, derives actuator states, evaluates
//! hazard rules, appends to the rolling history, and returns a snapshot for
//! serialization. All shared state lives behind a single lock; notification
//! I/O happens only after the lock is released.

use crate::actuators::{derive, ActuatorState};
use crate::cooldown::CooldownTracker;
use crate::hazards;
use crate::history::{HistoryEntry, HistoryLog, SensorFrame};
use crate::notify::{NotificationGateway, NotificationSink, OutboundAlert};
use crate::reading::{
    next_reading, ManualOverrides, OverridePatch, SensorReading, SimulationMode,
};

use homepulse_env::PulseContext;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Event label for ticks with no mode change and no override patch.
const AUTO_DRIFT: &str = "AUTO DRIFT";

/// Event label for the per-alert history entries.
const SAFETY_ALERT: &str = "SAFETY ALERT";

/// Configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum retained history entries
    pub history_capacity: usize,

    /// Minimum interval between notifications of the same kind
    pub cooldown_window: Duration,

    /// Initial mode
    pub initial_mode: SimulationMode,

    /// Initial override store (also the first MANUAL reading)
    pub initial_overrides: ManualOverrides,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            history_capacity: 60,
            cooldown_window: Duration::from_secs(60),
            initial_mode: SimulationMode::Auto,
            initial_overrides: ManualOverrides::default(),
        }
    }
}

/// The mutating entry point's request: an optional mode change and an
/// optional (boundary-validated) override patch.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TickRequest {
    pub mode: Option<SimulationMode>,
    pub overrides: Option<OverridePatch>,
}

impl TickRequest {
    /// A plain tick: no mode change, no overrides.
    pub fn drift() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: SimulationMode) -> Self {
        Self {
            mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn with_overrides(overrides: OverridePatch) -> Self {
        Self {
            overrides: Some(overrides),
            ..Self::default()
        }
    }
}

/// The `sensor_data` block of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorBlock {
    pub temperature: f64,
    pub motion: u8,
    pub light: f64,
    pub gas: f64,
    pub devices: ActuatorState,
    pub current_warnings: Vec<String>,
}

/// Immutable view of the engine state returned by `tick` and `get_state`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub timestamp: String,
    pub sensor_data: SensorBlock,
    pub mode: SimulationMode,
    pub history: Vec<HistoryEntry>,
}

/// Process-wide mutable state, guarded by the engine's single lock.
struct AppState {
    mode: SimulationMode,
    overrides: ManualOverrides,
    history: HistoryLog,
    current: SensorReading,
    actuators: ActuatorState,
    warnings: Vec<String>,
    cooldowns: CooldownTracker,
}

/// Orchestrates the simulation-and-alerting pipeline.
///
/// The engine is safe to share across request handlers: each `tick` is
/// atomic with respect to concurrent ticks (one lock around the whole
/// read-modify-write sequence), and the outbound push calls run after the
/// lock is dropped.
pub struct SimulationEngine<C: PulseContext> {
    ctx: Arc<C>,
    gateway: NotificationGateway,
    state: Mutex<AppState>,
}

impl<C: PulseContext> SimulationEngine<C> {
    /// Creates an engine with the given context, push sink, and config.
    pub fn new(ctx: Arc<C>, sink: Arc<dyn NotificationSink>, config: EngineConfig) -> Self {
        let current = config.initial_overrides.reading();
        let state = AppState {
            mode: config.initial_mode,
            overrides: config.initial_overrides,
            history: HistoryLog::new(config.history_capacity),
            current,
            actuators: derive(&current),
            warnings: Vec::new(),
            cooldowns: CooldownTracker::new(config.cooldown_window),
        };

        Self {
            ctx,
            gateway: NotificationGateway::new(sink),
            state: Mutex::new(state),
        }
    }

    /// Advances the simulation by one tick and returns the updated state.
    ///
    /// Never fails: malformed input is rejected at the boundary before it
    /// reaches the engine, and notification failures are swallowed by the
    /// gateway.
    pub async fn tick(&self, request: TickRequest) -> StateSnapshot {
        let stamp = timestamp_label(self.ctx.system_time());

        let (snapshot, outbound) = {
            let mut state = self.state.lock().unwrap();

            let mut label = AUTO_DRIFT.to_string();
            if let Some(mode) = request.mode {
                state.mode = mode;
                label = format!("MODE: {}", mode.label());
                info!(mode = mode.label(), "simulation mode changed");
            }
            if let Some(patch) = &request.overrides {
                patch.apply(&mut state.overrides);
                // Label names only the fields present in the request, even
                // though a MANUAL reading always consumes all four stored
                // values.
                label = format!(
                    "MANUAL: {} ADJ",
                    patch.changed_fields().join(", ").to_uppercase()
                );
            }

            let reading = next_reading(self.ctx.as_ref(), state.mode, &state.overrides);
            let actuators = derive(&reading);
            let frame = SensorFrame::new(&reading, &actuators);

            state.history.push(HistoryEntry {
                timestamp: stamp.clone(),
                event: label,
                data: frame.clone(),
                warnings: Vec::new(),
            });

            let now = self.ctx.now();
            let alerts = hazards::evaluate(&reading);
            let mut warnings = Vec::with_capacity(alerts.len());
            let mut outbound = Vec::new();

            for alert in alerts {
                state.history.push(HistoryEntry {
                    timestamp: stamp.clone(),
                    event: SAFETY_ALERT.to_string(),
                    data: frame.clone(),
                    warnings: vec![alert.message.clone()],
                });

                if state.cooldowns.should_send(alert.kind, now) {
                    state.cooldowns.mark_sent(alert.kind, now);
                    outbound.push(OutboundAlert {
                        title: alert.kind.to_string(),
                        body: alert.message.clone(),
                    });
                } else {
                    debug!(kind = alert.kind, "notification suppressed by cooldown");
                }

                warnings.push(alert.message);
            }

            let evicted = state.history.trim();
            if evicted > 0 {
                debug!(evicted, "history trimmed");
            }

            state.current = reading;
            state.actuators = actuators;
            state.warnings = warnings;

            (snapshot_of(&state, stamp), outbound)
        };

        // Push I/O runs outside the critical section; a concurrent tick may
        // begin before these deliveries complete.
        if !outbound.is_empty() {
            self.gateway.dispatch_all(&outbound).await;
        }

        snapshot
    }

    /// Returns the current state without mutating anything.
    pub fn get_state(&self) -> StateSnapshot {
        let stamp = timestamp_label(self.ctx.system_time());
        let state = self.state.lock().unwrap();
        snapshot_of(&state, stamp)
    }
}

fn snapshot_of(state: &AppState, timestamp: String) -> StateSnapshot {
    StateSnapshot {
        timestamp,
        sensor_data: SensorBlock {
            temperature: state.current.temperature,
            motion: state.current.motion,
            light: state.current.light,
            gas: state.current.gas,
            devices: state.actuators,
            current_warnings: state.warnings.clone(),
        },
        mode: state.mode,
        history: state.history.snapshot(),
    }
}

/// Formats a wall-clock instant as the local `HH:MM:SS` label.
fn timestamp_label(time: SystemTime) -> String {
    chrono::DateTime::<chrono::Local>::from(time)
        .format("%H:%M:%S")
        .to_string()
}
