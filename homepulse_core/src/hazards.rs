//! Hazard threshold rules.
//!
//! Four independent rules evaluated in fixed order against the current
//! reading, each producing at most one alert per tick.

use crate::reading::SensorReading;

/// Alert kind used as notification title and cooldown key.
pub const THERMAL_HAZARD: &str = "Thermal Hazard";
pub const GAS_LEAK: &str = "Gas Leak";
pub const SECURITY_ALERT: &str = "Security Alert";
pub const SENSOR_WARNING: &str = "Sensor Warning";

/// A fired hazard rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    /// Alert kind (cooldown key and notification title)
    pub kind: &'static str,

    /// Human-readable message carrying the offending value
    pub message: String,
}

/// Evaluates the threshold rules in fixed order:
///
/// 1. temperature > 35 → Thermal Hazard
/// 2. gas > 200 → Gas Leak
/// 3. motion == 1 → Security Alert
/// 4. light < 100 → Sensor Warning
///
/// Rules are independent; a single reading may fire zero to four alerts.
pub fn evaluate(reading: &SensorReading) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if reading.temperature > 35.0 {
        alerts.push(Alert {
            kind: THERMAL_HAZARD,
            message: format!("Thermal Hazard: Heat Spike At {:.1}°C", reading.temperature),
        });
    }

    if reading.gas > 200.0 {
        alerts.push(Alert {
            kind: GAS_LEAK,
            message: format!("Atmosphere Danger: Gas At {:.1} PPM", reading.gas),
        });
    }

    if reading.motion == 1 {
        alerts.push(Alert {
            kind: SECURITY_ALERT,
            message: "Sentinel Breach: Unauthorized Motion".to_string(),
        });
    }

    if reading.light < 100.0 {
        alerts.push(Alert {
            kind: SENSOR_WARNING,
            message: format!("Luminosity Low: Ambient {:.1} lx", reading.light),
        });
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature: f64, motion: u8, light: f64, gas: f64) -> SensorReading {
        SensorReading {
            temperature,
            motion,
            light,
            gas,
        }
    }

    #[test]
    fn test_quiet_reading_fires_nothing() {
        assert!(evaluate(&reading(24.0, 0, 400.0, 30.0)).is_empty());
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        assert!(evaluate(&reading(35.0, 0, 400.0, 30.0)).is_empty());
        assert!(evaluate(&reading(24.0, 0, 100.0, 30.0)).is_empty());
        assert!(evaluate(&reading(24.0, 0, 400.0, 200.0)).is_empty());
    }

    #[test]
    fn test_single_rule_messages() {
        let alerts = evaluate(&reading(36.5, 0, 400.0, 30.0));
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].kind, THERMAL_HAZARD);
        assert_eq!(alerts[0].message, "Thermal Hazard: Heat Spike At 36.5°C");

        let alerts = evaluate(&reading(24.0, 0, 80.0, 30.0));
        assert_eq!(alerts[0].kind, SENSOR_WARNING);
        assert_eq!(alerts[0].message, "Luminosity Low: Ambient 80.0 lx");

        let alerts = evaluate(&reading(24.0, 1, 400.0, 30.0));
        assert_eq!(alerts[0].kind, SECURITY_ALERT);
        assert_eq!(alerts[0].message, "Sentinel Breach: Unauthorized Motion");

        let alerts = evaluate(&reading(24.0, 0, 400.0, 250.0));
        assert_eq!(alerts[0].kind, GAS_LEAK);
        assert_eq!(alerts[0].message, "Atmosphere Danger: Gas At 250.0 PPM");
    }

    #[test]
    fn test_fixed_firing_order() {
        let alerts = evaluate(&reading(36.0, 1, 80.0, 250.0));
        let kinds: Vec<&str> = alerts.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![THERMAL_HAZARD, GAS_LEAK, SECURITY_ALERT, SENSOR_WARNING]
        );
    }
}
