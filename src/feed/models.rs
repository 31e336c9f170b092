use serde::Deserialize;

/// One in-progress match, flattened out of the feed's tournament nesting.
/// Snapshots are re-fetched every cycle and never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveEvent {
    pub event_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i32,
    pub away_score: i32,
    /// Elapsed match time in minutes, parsed from the feed's stage field.
    pub elapsed: i32,
    pub league: String,
    /// Kept for parity with the feed payload; the console has no use for it.
    #[allow(dead_code)]
    pub league_logo: String,
    pub country: String,
}

impl LiveEvent {
    pub fn goal_diff(&self) -> i32 {
        (self.home_score - self.away_score).abs()
    }

    pub fn score_line(&self) -> String {
        format!("{}-{}", self.home_score, self.away_score)
    }

    pub fn fixture(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

/// Raw statistics payload for one match. The feed optionally segments
/// entries by match phase; field names mirror the wire format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStats {
    #[serde(rename = "1st-half", default)]
    pub first_half: Vec<RawStatEntry>,
    #[serde(rename = "all-match", default)]
    pub all_match: Vec<RawStatEntry>,
}

/// A single named statistic with one value per side. Values arrive as
/// strings or numbers depending on the statistic, so they stay untyped
/// until normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub home_team: serde_json::Value,
    #[serde(default)]
    pub away_team: serde_json::Value,
}

impl RawStats {
    /// First-half numbers are preferred when the feed provides them.
    pub fn entries(&self) -> &[RawStatEntry] {
        if self.first_half.is_empty() {
            &self.all_match
        } else {
            &self.first_half
        }
    }
}

/// Parse elapsed minutes from the feed's free-text stage field.
///
/// The feed sometimes reports a phase label instead of a minute count;
/// phases map to representative minutes ("1st half" → 25, "halftime" → 45,
/// "2nd half" → 60). Anything unparseable counts as minute 0, which keeps
/// the match out of every scout window.
pub fn parse_elapsed(stage: &str) -> i32 {
    let s = stage.trim().to_lowercase();
    if s.is_empty() {
        return 0;
    }
    if s.contains("2nd half") {
        return 60;
    }
    if s.contains("1st half") {
        return 25;
    }
    if s.contains("halftime") {
        return 45;
    }
    s.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_elapsed_phases() {
        assert_eq!(parse_elapsed("1st half"), 25);
        assert_eq!(parse_elapsed("Halftime"), 45);
        assert_eq!(parse_elapsed("2nd Half"), 60);
    }

    #[test]
    fn test_parse_elapsed_numeric() {
        assert_eq!(parse_elapsed("67"), 67);
        assert_eq!(parse_elapsed(" 23 "), 23);
    }

    #[test]
    fn test_parse_elapsed_garbage() {
        assert_eq!(parse_elapsed(""), 0);
        assert_eq!(parse_elapsed("Postponed"), 0);
        assert_eq!(parse_elapsed("45+2"), 0);
    }

    #[test]
    fn test_entries_prefers_first_half() {
        let entry = |name: &str| RawStatEntry {
            name: name.into(),
            home_team: serde_json::Value::Null,
            away_team: serde_json::Value::Null,
        };
        let raw = RawStats {
            first_half: vec![entry("Total Shots")],
            all_match: vec![entry("Total Shots"), entry("Corner Kicks")],
        };
        assert_eq!(raw.entries().len(), 1);

        let raw = RawStats {
            first_half: vec![],
            all_match: vec![entry("Corner Kicks")],
        };
        assert_eq!(raw.entries()[0].name, "Corner Kicks");
    }

    #[test]
    fn test_goal_diff_and_score_line() {
        let event = LiveEvent {
            event_id: "1".into(),
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            home_score: 0,
            away_score: 2,
            elapsed: 70,
            league: "Premier League".into(),
            league_logo: String::new(),
            country: "England".into(),
        };
        assert_eq!(event.goal_diff(), 2);
        assert_eq!(event.score_line(), "0-2");
        assert_eq!(event.fixture(), "Arsenal vs Chelsea");
    }
}
