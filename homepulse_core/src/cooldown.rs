//! Per-alert-kind notification throttling.

use std::collections::HashMap;
use std::time::Duration;

/// Keyed last-dispatch map enforcing a minimum interval between repeated
/// notifications of the same kind.
///
/// Entries are created lazily on the first alert of a kind and never
/// explicitly deleted. Timestamps are monotonic durations from
/// `PulseContext::now()`.
#[derive(Debug)]
pub struct CooldownTracker {
    window: Duration,
    last_sent: HashMap<String, Duration>,
}

impl CooldownTracker {
    /// Creates a tracker with the given minimum interval.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_sent: HashMap::new(),
        }
    }

    /// Returns true iff no prior dispatch exists for `kind` or the window
    /// has elapsed since the last one.
    pub fn should_send(&self, kind: &str, now: Duration) -> bool {
        match self.last_sent.get(kind) {
            None => true,
            Some(&last) => now.saturating_sub(last) >= self.window,
        }
    }

    /// Records a dispatch attempt for `kind`.
    ///
    /// Called at decision time, before the network attempt, so a failed
    /// delivery still respects the window.
    pub fn mark_sent(&mut self, kind: &str, now: Duration) {
        self.last_sent.insert(kind.to_string(), now);
    }

    /// Number of kinds seen so far.
    pub fn tracked_kinds(&self) -> usize {
        self.last_sent.len()
    }
}
