//! Actuator states derived from the current sensor reading.

use crate::reading::SensorReading;
use serde::{Deserialize, Serialize};

/// On/off state of one device, serialized as `"ON"` / `"OFF"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceState {
    On,
    Off,
}

impl DeviceState {
    fn from_bool(on: bool) -> Self {
        if on {
            DeviceState::On
        } else {
            DeviceState::Off
        }
    }

    /// Returns true if the device is on.
    pub fn is_on(&self) -> bool {
        matches!(self, DeviceState::On)
    }
}

/// Dependent device states, fully recomputed from the reading every tick.
/// No memory of prior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorState {
    pub fan: DeviceState,
    pub lights: DeviceState,
    pub alarm: DeviceState,
}

/// Derives actuator states from a reading. Pure, total function:
///
/// - fan ON iff temperature > 30
/// - alarm ON iff gas > 150
/// - lights ON iff motion detected or light < 150
pub fn derive(reading: &SensorReading) -> ActuatorState {
    ActuatorState {
        fan: DeviceState::from_bool(reading.temperature > 30.0),
        lights: DeviceState::from_bool(reading.motion == 1 || reading.light < 150.0),
        alarm: DeviceState::from_bool(reading.gas > 150.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn reading(temperature: f64, motion: u8, light: f64, gas: f64) -> SensorReading {
        SensorReading {
            temperature,
            motion,
            light,
            gas,
        }
    }

    #[test]
    fn test_derive_thresholds() {
        // (reading, fan, lights, alarm)
        let cases = [
            (reading(24.0, 0, 400.0, 30.0), false, false, false),
            (reading(30.0, 0, 400.0, 30.0), false, false, false),
            (reading(30.01, 0, 400.0, 30.0), true, false, false),
            (reading(24.0, 0, 400.0, 150.0), false, false, false),
            (reading(24.0, 0, 400.0, 150.01), false, false, true),
            (reading(24.0, 1, 400.0, 30.0), false, true, false),
            (reading(24.0, 0, 150.0, 30.0), false, false, false),
            (reading(24.0, 0, 149.9, 30.0), false, true, false),
            (reading(36.0, 1, 80.0, 250.0), true, true, true),
        ];

        for (r, fan, lights, alarm) in cases {
            let state = derive(&r);
            assert_eq!(state.fan.is_on(), fan, "fan for {r:?}");
            assert_eq!(state.lights.is_on(), lights, "lights for {r:?}");
            assert_eq!(state.alarm.is_on(), alarm, "alarm for {r:?}");
        }
    }

    #[test]
    fn test_device_state_serialization() {
        assert_eq!(serde_json::to_string(&DeviceState::On).unwrap(), "\"ON\"");
        assert_eq!(serde_json::to_string(&DeviceState::Off).unwrap(), "\"OFF\"");
    }

    proptest! {
        #[test]
        fn derivation_matches_predicates(
            temperature in -50.0f64..100.0,
            motion in 0u8..=1,
            light in 0.0f64..=1000.0,
            gas in 0.0f64..10_000.0,
        ) {
            let state = derive(&reading(temperature, motion, light, gas));
            prop_assert_eq!(state.fan.is_on(), temperature > 30.0);
            prop_assert_eq!(state.alarm.is_on(), gas > 150.0);
            prop_assert_eq!(state.lights.is_on(), motion == 1 || light < 150.0);
        }

        #[test]
        fn derivation_is_pure(
            temperature in -50.0f64..100.0,
            motion in 0u8..=1,
            light in 0.0f64..=1000.0,
            gas in 0.0f64..10_000.0,
        ) {
            let r = reading(temperature, motion, light, gas);
            prop_assert_eq!(derive(&r), derive(&r));
        }
    }
}
