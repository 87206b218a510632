//! HomePulse simulation and alerting engine.
//!
//! This crate simulates environmental sensors for a home, derives actuator
//! states from the readings, detects hazardous conditions, and dispatches
//! throttled push notifications while retaining a bounded rolling log of
//! state transitions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    SimulationEngine                      │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │ AppState (single Mutex: mode, overrides, history,  │  │
//! │  │           current reading, cooldowns)              │  │
//! │  └────────────────────────────────────────────────────┘  │
//! │     │ tick()                                             │
//! │     ▼                                                    │
//! │  reading model ──► actuator derivation ──► hazard rules  │
//! │                                                │         │
//! │                      history log ◄─────────────┤         │
//! │                                                ▼         │
//! │                              cooldown gate ──► gateway   │
//! └──────────────────────────────────────│───────────────────┘
//!                                        ▼ (after lock release)
//!                               push endpoint (best effort)
//! ```
//!
//! Time and randomness come exclusively from a
//! [`PulseContext`](homepulse_env::PulseContext), so the whole pipeline is
//! reproducible under a seeded simulation context.

pub mod actuators;
pub mod cooldown;
pub mod engine;
pub mod hazards;
pub mod history;
pub mod notify;
pub mod reading;

pub use actuators::{derive, ActuatorState, DeviceState};
pub use cooldown::CooldownTracker;
pub use engine::{EngineConfig, SimulationEngine, StateSnapshot, TickRequest};
pub use hazards::Alert;
pub use history::{HistoryEntry, HistoryLog, SensorFrame};
pub use notify::{
    NotificationGateway, NotificationSink, NotifyConfig, NotifyError, NtfySink, OutboundAlert,
};
pub use reading::{
    next_reading, ManualOverrides, OverrideError, OverridePatch, SensorReading, SimulationMode,
};
