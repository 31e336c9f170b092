//! Normalizes the feed's free-text statistics into a fixed metric set.
//!
//! Upstream statistic names drift ("Ball Possession (%)", "Expected Goals
//! (xG)"), so matching goes through an explicit table mapping a normalized
//! label to a canonical metric, with a per-entry match mode. Missing or
//! malformed values fall back to a neutral baseline instead of failing the
//! scan cycle.

use super::models::RawStats;

/// Canonical metric keys every normalized payload carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetricKey {
    Possession,
    Shots,
    ShotsOnTarget,
    Corners,
    DangerousAttacks,
    ExpectedGoals,
}

/// How a table entry matches a normalized (trimmed, lowercased) label.
#[derive(Debug, Clone, Copy)]
enum LabelMatch {
    Exact,
    Contains,
}

/// Canonical-name mapping. Contains-mode entries absorb the decoration the
/// feed adds around possession, xG, and big-chance labels.
const METRIC_TABLE: &[(MetricKey, &str, LabelMatch)] = &[
    (MetricKey::Possession, "ball possession", LabelMatch::Contains),
    (MetricKey::Shots, "total shots", LabelMatch::Exact),
    (MetricKey::ShotsOnTarget, "shots on target", LabelMatch::Exact),
    (MetricKey::Corners, "corner kicks", LabelMatch::Exact),
    (MetricKey::ExpectedGoals, "expected goals", LabelMatch::Contains),
    (MetricKey::DangerousAttacks, "big chances", LabelMatch::Contains),
];

/// A single statistic with one value per side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricPair {
    pub home: f64,
    pub away: f64,
}

impl MetricPair {
    const fn splat(v: f64) -> Self {
        MetricPair { home: v, away: v }
    }

    pub fn total(&self) -> f64 {
        self.home + self.away
    }
}

/// The fixed metric set for one match.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedStats {
    pub possession: MetricPair,
    pub shots: MetricPair,
    pub shots_on_target: MetricPair,
    pub corners: MetricPair,
    pub dangerous_attacks: MetricPair,
    pub expected_goals: MetricPair,
}

impl Default for NormalizedStats {
    /// Baseline used when statistics are missing: counts at zero,
    /// possession split evenly.
    fn default() -> Self {
        NormalizedStats {
            possession: MetricPair::splat(50.0),
            shots: MetricPair::splat(0.0),
            shots_on_target: MetricPair::splat(0.0),
            corners: MetricPair::splat(0.0),
            dangerous_attacks: MetricPair::splat(0.0),
            expected_goals: MetricPair::splat(0.0),
        }
    }
}

impl NormalizedStats {
    /// Normalize a raw payload. `None` (a failed or empty stats fetch)
    /// yields the full baseline; the cycle proceeds either way.
    pub fn from_raw(raw: Option<&RawStats>) -> Self {
        let mut stats = NormalizedStats::default();
        let raw = match raw {
            Some(r) => r,
            None => return stats,
        };

        for entry in raw.entries() {
            let label = entry.name.trim().to_lowercase();
            let key = match lookup(&label) {
                Some(k) => k,
                None => continue,
            };
            let default = if key == MetricKey::Possession { 50.0 } else { 0.0 };
            let pair = MetricPair {
                home: coerce_numeric(&entry.home_team, default),
                away: coerce_numeric(&entry.away_team, default),
            };
            match key {
                MetricKey::Possession => stats.possession = pair,
                MetricKey::Shots => stats.shots = pair,
                MetricKey::ShotsOnTarget => stats.shots_on_target = pair,
                MetricKey::Corners => stats.corners = pair,
                MetricKey::DangerousAttacks => stats.dangerous_attacks = pair,
                MetricKey::ExpectedGoals => stats.expected_goals = pair,
            }
        }
        stats
    }
}

fn lookup(label: &str) -> Option<MetricKey> {
    METRIC_TABLE.iter().find_map(|(key, canonical, mode)| {
        let hit = match mode {
            LabelMatch::Exact => label == *canonical,
            LabelMatch::Contains => label.contains(canonical),
        };
        hit.then_some(*key)
    })
}

/// Strip non-numeric decoration ("57%", " 1.84 ") and parse; values that
/// still fail to parse take the metric's default.
fn coerce_numeric(value: &serde_json::Value, default: f64) -> f64 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(default),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().unwrap_or(default)
        }
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::models::RawStatEntry;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn entry(name: &str, home: serde_json::Value, away: serde_json::Value) -> RawStatEntry {
        RawStatEntry {
            name: name.into(),
            home_team: home,
            away_team: away,
        }
    }

    #[test]
    fn test_absent_payload_yields_baseline() {
        let stats = NormalizedStats::from_raw(None);
        assert_relative_eq!(stats.possession.home, 50.0);
        assert_relative_eq!(stats.possession.away, 50.0);
        assert_relative_eq!(stats.shots.total(), 0.0);
        assert_relative_eq!(stats.expected_goals.total(), 0.0);
    }

    #[test]
    fn test_full_payload_normalizes() {
        let raw = RawStats {
            first_half: vec![],
            all_match: vec![
                entry("Ball Possession (%)", json!("57%"), json!("43%")),
                entry("Total Shots", json!(9), json!(6)),
                entry("Shots on Target", json!("3"), json!(2)),
                entry("Corner Kicks", json!(4), json!(1)),
                entry("Big Chances Created", json!(12), json!(8)),
                entry("Expected Goals (xG)", json!("1.42"), json!(0.77)),
            ],
        };
        let stats = NormalizedStats::from_raw(Some(&raw));
        assert_relative_eq!(stats.possession.home, 57.0);
        assert_relative_eq!(stats.possession.away, 43.0);
        assert_relative_eq!(stats.shots.total(), 15.0);
        assert_relative_eq!(stats.shots_on_target.total(), 5.0);
        assert_relative_eq!(stats.corners.total(), 5.0);
        assert_relative_eq!(stats.dangerous_attacks.total(), 20.0);
        assert_relative_eq!(stats.expected_goals.total(), 2.19, epsilon = 1e-9);
    }

    #[test]
    fn test_exact_labels_do_not_match_by_substring() {
        // "total shots inside box" must not be mistaken for "total shots"
        let raw = RawStats {
            first_half: vec![],
            all_match: vec![entry("Total Shots Inside Box", json!(5), json!(2))],
        };
        let stats = NormalizedStats::from_raw(Some(&raw));
        assert_relative_eq!(stats.shots.total(), 0.0);
    }

    #[test]
    fn test_first_half_segment_preferred() {
        let raw = RawStats {
            first_half: vec![entry("Total Shots", json!(4), json!(2))],
            all_match: vec![entry("Total Shots", json!(11), json!(9))],
        };
        let stats = NormalizedStats::from_raw(Some(&raw));
        assert_relative_eq!(stats.shots.total(), 6.0);
    }

    #[test]
    fn test_malformed_values_take_defaults() {
        let raw = RawStats {
            first_half: vec![],
            all_match: vec![
                entry("Ball Possession", json!("abc"), json!(null)),
                entry("Total Shots", json!("-"), json!("seven")),
            ],
        };
        let stats = NormalizedStats::from_raw(Some(&raw));
        assert_relative_eq!(stats.possession.home, 50.0);
        assert_relative_eq!(stats.possession.away, 50.0);
        assert_relative_eq!(stats.shots.home, 0.0);
        assert_relative_eq!(stats.shots.away, 0.0);
    }

    #[test]
    fn test_unknown_labels_ignored() {
        let raw = RawStats {
            first_half: vec![],
            all_match: vec![entry("Offsides", json!(3), json!(1))],
        };
        assert_eq!(NormalizedStats::from_raw(Some(&raw)), NormalizedStats::default());
    }
}
