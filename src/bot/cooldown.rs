use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Per-match alert suppression.
///
/// Maps an event id to the time of its last emitted alert. The registry is
/// owned by the scan loop for the lifetime of the process; the clock is
/// always passed in so tests can drive time deterministically.
#[derive(Debug)]
pub struct CooldownRegistry {
    window: Duration,
    last_alert: HashMap<String, DateTime<Utc>>,
}

impl CooldownRegistry {
    pub fn new(window: Duration) -> Self {
        CooldownRegistry {
            window,
            last_alert: HashMap::new(),
        }
    }

    /// True iff an alert for this event fired less than one window ago.
    pub fn is_suppressed(&self, event_id: &str, now: DateTime<Utc>) -> bool {
        self.last_alert
            .get(event_id)
            .map_or(false, |last| now < *last + self.window)
    }

    /// Record an alert for this event. Unconditional overwrite: the window
    /// restarts from the newest alert.
    pub fn record_alert(&mut self, event_id: &str, now: DateTime<Utc>) {
        self.last_alert.insert(event_id.to_string(), now);
    }

    /// Evict entries whose window has fully elapsed. They can no longer
    /// suppress anything, so this only bounds the map's growth.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let window = self.window;
        self.last_alert.retain(|_, last| now < *last + window);
    }

    pub fn len(&self) -> usize {
        self.last_alert.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, h, m, 0).unwrap()
    }

    #[test]
    fn test_unknown_event_not_suppressed() {
        let registry = CooldownRegistry::new(Duration::minutes(15));
        assert!(!registry.is_suppressed("ev1", at(10, 0)));
    }

    #[test]
    fn test_suppression_window() {
        // Alert at 10:00 → suppressed at 10:05, evaluated normally at 10:16
        let mut registry = CooldownRegistry::new(Duration::minutes(15));
        registry.record_alert("ev1", at(10, 0));

        assert!(registry.is_suppressed("ev1", at(10, 5)));
        assert!(registry.is_suppressed("ev1", at(10, 14)));
        // Exactly one window later the suppression ends
        assert!(!registry.is_suppressed("ev1", at(10, 15)));
        assert!(!registry.is_suppressed("ev1", at(10, 16)));
    }

    #[test]
    fn test_other_events_unaffected() {
        let mut registry = CooldownRegistry::new(Duration::minutes(15));
        registry.record_alert("ev1", at(10, 0));
        assert!(!registry.is_suppressed("ev2", at(10, 5)));
    }

    #[test]
    fn test_record_overwrites() {
        let mut registry = CooldownRegistry::new(Duration::minutes(15));
        registry.record_alert("ev1", at(10, 0));
        registry.record_alert("ev1", at(10, 20));
        // The window restarts from the second alert
        assert!(registry.is_suppressed("ev1", at(10, 30)));
        assert!(!registry.is_suppressed("ev1", at(10, 35)));
    }

    #[test]
    fn test_prune_keeps_live_entries() {
        let mut registry = CooldownRegistry::new(Duration::minutes(15));
        registry.record_alert("old", at(10, 0));
        registry.record_alert("fresh", at(10, 20));

        registry.prune(at(10, 25));
        assert_eq!(registry.len(), 1);
        assert!(registry.is_suppressed("fresh", at(10, 25)));
        assert!(!registry.is_suppressed("old", at(10, 25)));
    }
}
