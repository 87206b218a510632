//! Sensor readings, manual overrides, and the reading model.
//!
//! The reading model is a pure function of the context's wall-clock time and
//! RNG stream: a slow sine waveform per channel plus bounded jitter, with
//! rare probabilistic excursions for gas spikes and motion events.

use homepulse_env::PulseContext;
use serde::{Deserialize, Serialize};
use std::time::UNIX_EPOCH;
use thiserror::Error;

/// Simulation mode: autonomous waveform-driven readings vs. caller-supplied
/// override readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimulationMode {
    Auto,
    Manual,
}

impl SimulationMode {
    /// Uppercase label used in mode-change history events.
    pub fn label(&self) -> &'static str {
        match self {
            SimulationMode::Auto => "AUTO",
            SimulationMode::Manual => "MANUAL",
        }
    }
}

/// One environmental sensor reading.
///
/// Invariant: `light` is clamped to `[0, 1000]`; all fields are finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Temperature in °C
    pub temperature: f64,

    /// Motion detected this tick (0 or 1)
    pub motion: u8,

    /// Ambient light in lux
    pub light: f64,

    /// Gas concentration in PPM
    pub gas: f64,
}

/// Caller-settable last-known values, applied verbatim whenever the engine
/// runs in MANUAL mode.
///
/// Patches merge into this store field-by-field, but the reading model
/// always consumes the *complete* four-field record: a patch touching one
/// field still causes all four stored values to overwrite the next reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualOverrides {
    pub temperature: f64,
    pub motion: u8,
    pub light: f64,
    pub gas: f64,
}

impl Default for ManualOverrides {
    fn default() -> Self {
        Self {
            temperature: 24.0,
            motion: 0,
            light: 400.0,
            gas: 30.0,
        }
    }
}

impl ManualOverrides {
    /// Returns the full override record as a reading.
    pub fn reading(&self) -> SensorReading {
        SensorReading {
            temperature: self.temperature,
            motion: self.motion,
            light: self.light,
            gas: self.gas,
        }
    }
}

/// A partial override update from the boundary layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverridePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<f64>,
}

/// Rejection reasons for a malformed override patch.
///
/// Validation is the boundary layer's responsibility; the engine assumes
/// patches it receives have already passed [`OverridePatch::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum OverrideError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} out of range: {value} (allowed {min} to {max})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("motion must be 0 or 1, got {0}")]
    BadMotion(u8),
}

impl OverridePatch {
    /// Merges the supplied fields into the override store.
    pub fn apply(&self, overrides: &mut ManualOverrides) {
        if let Some(temperature) = self.temperature {
            overrides.temperature = temperature;
        }
        if let Some(motion) = self.motion {
            overrides.motion = motion;
        }
        if let Some(light) = self.light {
            overrides.light = light;
        }
        if let Some(gas) = self.gas {
            overrides.gas = gas;
        }
    }

    /// Names of the fields present in this patch, in the fixed field order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.temperature.is_some() {
            fields.push("temperature");
        }
        if self.motion.is_some() {
            fields.push("motion");
        }
        if self.light.is_some() {
            fields.push("light");
        }
        if self.gas.is_some() {
            fields.push("gas");
        }
        fields
    }

    /// Returns true if no field is present.
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Validates field ranges at the request boundary.
    pub fn validate(&self) -> Result<(), OverrideError> {
        check_range("temperature", self.temperature, -50.0, 100.0)?;
        check_range("light", self.light, 0.0, 1000.0)?;
        check_range("gas", self.gas, 0.0, 10_000.0)?;
        if let Some(motion) = self.motion {
            if motion > 1 {
                return Err(OverrideError::BadMotion(motion));
            }
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: Option<f64>,
    min: f64,
    max: f64,
) -> Result<(), OverrideError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !value.is_finite() {
        return Err(OverrideError::NotFinite { field, value });
    }
    if value < min || value > max {
        return Err(OverrideError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Produces the next sensor reading.
///
/// AUTO mode samples the waveform model at the context's wall-clock time;
/// MANUAL mode returns the full override record verbatim.
///
/// RNG draw order in AUTO mode (relevant for scripted test contexts):
/// temperature jitter, light jitter, gas spike gate, gas spike magnitude or
/// gas noise, motion gate.
pub fn next_reading<C: PulseContext>(
    ctx: &C,
    mode: SimulationMode,
    overrides: &ManualOverrides,
) -> SensorReading {
    match mode {
        SimulationMode::Manual => overrides.reading(),
        SimulationMode::Auto => {
            let t = ctx
                .system_time()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs_f64();

            let temperature =
                round1(22.0 + 4.0 * (t / 800.0).sin() + ctx.random_range(-0.1, 0.1));

            let light = (500.0 + 450.0 * (t / 1500.0).sin() + ctx.random_range(-5.0, 5.0))
                .clamp(0.0, 1000.0)
                .round();

            // Rare large excursion (p = 0.02), otherwise small noise.
            let spike = if ctx.random_unit() > 0.98 {
                180.0 * ctx.random_unit()
            } else {
                ctx.random_range(-1.0, 1.0)
            };
            let gas = round1(30.0 + spike);

            let motion = if ctx.random_unit() > 0.97 { 1 } else { 0 };

            SensorReading {
                temperature,
                motion,
                light,
                gas,
            }
        }
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    /// Context with a frozen clock and a scripted RNG stream.
    ///
    /// `random_unit` pops the next scripted sample (default 0.5 when the
    /// script is exhausted); `random_range` maps a sample into `[lo, hi)`.
    struct ScriptedContext {
        wall_secs: f64,
        samples: Mutex<VecDeque<f64>>,
    }

    impl ScriptedContext {
        fn new(wall_secs: f64, samples: &[f64]) -> Self {
            Self {
                wall_secs,
                samples: Mutex::new(samples.iter().copied().collect()),
            }
        }
    }

    #[async_trait]
    impl PulseContext for ScriptedContext {
        fn now(&self) -> Duration {
            Duration::from_secs_f64(self.wall_secs)
        }

        fn system_time(&self) -> SystemTime {
            UNIX_EPOCH + Duration::from_secs_f64(self.wall_secs)
        }

        async fn sleep(&self, _duration: Duration) {}

        fn random_unit(&self) -> f64 {
            self.samples.lock().unwrap().pop_front().unwrap_or(0.5)
        }

        fn random_range(&self, low: f64, high: f64) -> f64 {
            low + self.random_unit() * (high - low)
        }

        fn seed(&self) -> u64 {
            0
        }
    }

    #[test]
    fn test_manual_mode_returns_overrides_verbatim() {
        let ctx = ScriptedContext::new(1000.0, &[]);
        let overrides = ManualOverrides {
            temperature: 40.0,
            motion: 1,
            light: 80.0,
            gas: 250.0,
        };

        let reading = next_reading(&ctx, SimulationMode::Manual, &overrides);
        assert_eq!(reading, overrides.reading());
    }

    #[test]
    fn test_auto_waveform_without_jitter() {
        // All samples 0.5: zero jitter, no spike, no motion.
        let t = 400.0 * std::f64::consts::PI; // sin(t/800) = sin(pi/2) = 1
        let ctx = ScriptedContext::new(t, &[0.5, 0.5, 0.5, 0.5, 0.5]);

        let reading = next_reading(&ctx, SimulationMode::Auto, &ManualOverrides::default());

        assert_relative_eq!(reading.temperature, 26.0, max_relative = 1e-9);
        let expected_light = (500.0 + 450.0 * (t / 1500.0).sin()).round();
        assert_relative_eq!(reading.light, expected_light, max_relative = 1e-9);
        assert_relative_eq!(reading.gas, 30.0, max_relative = 1e-9);
        assert_eq!(reading.motion, 0);
    }

    #[test]
    fn test_auto_gas_spike_and_motion() {
        // temp jitter, light jitter, gas gate (> 0.98 fires), spike
        // magnitude, motion gate (> 0.97 fires).
        let ctx = ScriptedContext::new(0.0, &[0.5, 0.5, 0.99, 1.0, 0.99]);

        let reading = next_reading(&ctx, SimulationMode::Auto, &ManualOverrides::default());

        assert_relative_eq!(reading.gas, 210.0, max_relative = 1e-9);
        assert_eq!(reading.motion, 1);
    }

    #[test]
    fn test_auto_light_clamped() {
        // Maximum positive jitter at the waveform peak stays within bounds.
        let t = 750.0 * std::f64::consts::PI; // sin(t/1500) = 1
        let ctx = ScriptedContext::new(t, &[0.5, 0.999999, 0.5, 0.5, 0.5]);

        let reading = next_reading(&ctx, SimulationMode::Auto, &ManualOverrides::default());
        assert!(reading.light <= 1000.0);
    }

    #[test]
    fn test_auto_rounding() {
        let ctx = ScriptedContext::new(0.0, &[0.5, 0.5, 0.5, 0.5, 0.5]);
        let reading = next_reading(&ctx, SimulationMode::Auto, &ManualOverrides::default());

        // One decimal for temperature/gas, whole number for light.
        assert_relative_eq!(reading.temperature * 10.0, (reading.temperature * 10.0).round());
        assert_relative_eq!(reading.gas * 10.0, (reading.gas * 10.0).round());
        assert_relative_eq!(reading.light, reading.light.round());
    }

    #[test]
    fn test_patch_merges_partially() {
        let mut overrides = ManualOverrides::default();
        let patch = OverridePatch {
            temperature: Some(40.0),
            ..Default::default()
        };
        patch.apply(&mut overrides);

        assert_eq!(overrides.temperature, 40.0);
        assert_eq!(overrides.light, 400.0);
        assert_eq!(overrides.gas, 30.0);
        assert_eq!(overrides.motion, 0);
    }

    #[test]
    fn test_patch_changed_fields_order() {
        let patch = OverridePatch {
            gas: Some(10.0),
            temperature: Some(25.0),
            ..Default::default()
        };
        assert_eq!(patch.changed_fields(), vec!["temperature", "gas"]);
    }

    #[test]
    fn test_validate_rejects_non_finite() {
        let patch = OverridePatch {
            temperature: Some(f64::NAN),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(OverrideError::NotFinite { field: "temperature", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let patch = OverridePatch {
            light: Some(1500.0),
            ..Default::default()
        };
        assert!(matches!(
            patch.validate(),
            Err(OverrideError::OutOfRange { field: "light", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_motion() {
        let patch = OverridePatch {
            motion: Some(2),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Err(OverrideError::BadMotion(2)));
    }

    #[test]
    fn test_validate_accepts_in_range() {
        let patch = OverridePatch {
            temperature: Some(36.5),
            motion: Some(1),
            light: Some(80.0),
            gas: Some(250.0),
        };
        assert_eq!(patch.validate(), Ok(()));
    }

    #[test]
    fn test_mode_serialization() {
        assert_eq!(
            serde_json::to_string(&SimulationMode::Auto).unwrap(),
            "\"auto\""
        );
        assert_eq!(
            serde_json::to_string(&SimulationMode::Manual).unwrap(),
            "\"manual\""
        );
    }
}
