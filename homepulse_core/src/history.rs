//! Bounded rolling log of state transitions.

use crate::actuators::ActuatorState;
use crate::reading::SensorReading;
use serde::{Deserialize, Serialize};

/// Sensor-data-shaped snapshot stored inside a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub temperature: f64,
    pub motion: u8,
    pub light: f64,
    pub gas: f64,
    pub devices: ActuatorState,
}

impl SensorFrame {
    /// Snapshots a reading together with its derived actuator states.
    pub fn new(reading: &SensorReading, devices: &ActuatorState) -> Self {
        Self {
            temperature: reading.temperature,
            motion: reading.motion,
            light: reading.light,
            gas: reading.gas,
            devices: *devices,
        }
    }
}

/// One snapshot in the rolling log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Local wall-clock label, `HH:MM:SS`
    pub timestamp: String,

    /// Event label ("AUTO DRIFT", "SAFETY ALERT", mode/override labels)
    pub event: String,

    /// Reading + actuator snapshot at creation time
    pub data: SensorFrame,

    /// Warning messages attached to this entry
    pub warnings: Vec<String>,
}

/// Ordered sequence of history entries, insertion order = chronological.
///
/// Invariant: `len() <= capacity` after every tick; oldest entries are
/// evicted first. Trimming runs after each batch of appends, not per push,
/// so a single tick can momentarily exceed the bound before `trim`.
#[derive(Debug)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl HistoryLog {
    /// Creates an empty log bounded to `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Appends an entry without trimming.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Evicts oldest entries until the bound holds. Returns the number of
    /// entries removed.
    pub fn trim(&mut self) -> usize {
        if self.entries.len() <= self.capacity {
            return 0;
        }
        let excess = self.entries.len() - self.capacity;
        self.entries.drain(..excess);
        excess
    }

    /// Chronological view of the retained entries.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Clones the retained entries for serialization.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuators::derive;

    fn entry(label: &str) -> HistoryEntry {
        let reading = SensorReading {
            temperature: 24.0,
            motion: 0,
            light: 400.0,
            gas: 30.0,
        };
        HistoryEntry {
            timestamp: "12:00:00".to_string(),
            event: label.to_string(),
            data: SensorFrame::new(&reading, &derive(&reading)),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn test_push_preserves_order() {
        let mut log = HistoryLog::new(10);
        log.push(entry("first"));
        log.push(entry("second"));

        assert_eq!(log.entries()[0].event, "first");
        assert_eq!(log.entries()[1].event, "second");
    }

    #[test]
    fn test_trim_evicts_oldest_first() {
        let mut log = HistoryLog::new(3);
        for i in 0..5 {
            log.push(entry(&format!("e{i}")));
        }

        assert_eq!(log.trim(), 2);
        assert_eq!(log.len(), 3);
        let events: Vec<&str> = log.entries().iter().map(|e| e.event.as_str()).collect();
        assert_eq!(events, vec!["e2", "e3", "e4"]);
    }

    #[test]
    fn test_trim_noop_under_capacity() {
        let mut log = HistoryLog::new(5);
        log.push(entry("only"));
        assert_eq!(log.trim(), 0);
        assert_eq!(log.len(), 1);
    }
}
