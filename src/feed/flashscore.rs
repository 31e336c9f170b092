use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::models::{parse_elapsed, LiveEvent, RawStats};
use super::provider::EventFeed;
use crate::error::FeedError;

/// Live-event feed backed by the Flashscore4 API on RapidAPI.
pub struct Flashscore {
    http: Client,
    api_key: String,
    host: String,
    /// Base URL for overriding in tests
    base_url: String,
}

impl Flashscore {
    pub fn new(
        api_key: &str,
        host: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Flashscore {
            http,
            api_key: api_key.to_string(),
            host: host.to_string(),
            base_url: base_url
                .map(str::to_string)
                .unwrap_or_else(|| format!("https://{}", host)),
        })
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FeedError> {
        let resp = self
            .http
            .get(url)
            .header("X-RapidAPI-Key", &self.api_key)
            .header("X-RapidAPI-Host", &self.host)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(FeedError::Status(resp.status()));
        }

        Ok(resp.json().await?)
    }
}

#[async_trait]
impl EventFeed for Flashscore {
    fn name(&self) -> &str {
        "Flashscore4"
    }

    async fn fetch_live_events(&self) -> Result<Vec<LiveEvent>> {
        let url = format!("{}/api/flashscore/v1/match/live/1", self.base_url);
        debug!("Fetching live events from {}", url);

        let raw = self
            .get_json(&url)
            .await
            .context("Flashscore live-list request failed")?;

        Ok(flatten_live_response(&raw))
    }

    async fn fetch_event_stats(&self, event_id: &str) -> Result<RawStats> {
        let url = format!("{}/api/flashscore/v1/match/stats/{}", self.base_url, event_id);
        debug!("Fetching stats from {}", url);

        let raw = self
            .get_json(&url)
            .await
            .with_context(|| format!("Flashscore stats request failed for {}", event_id))?;

        let stats = serde_json::from_value(raw).map_err(|e| FeedError::Decode(e.to_string()))?;
        Ok(stats)
    }
}

/// Flatten the tournament → matches nesting into a flat event list,
/// attaching league name/logo/country to each match on the way.
fn flatten_live_response(raw: &serde_json::Value) -> Vec<LiveEvent> {
    let tournaments = match raw.as_array() {
        Some(a) => a,
        None => return vec![],
    };

    let mut events = Vec::new();
    for tournament in tournaments {
        let league = tournament["name"].as_str().unwrap_or("Unknown").to_string();
        let league_logo = tournament["image_path"].as_str().unwrap_or("").to_string();
        let country = tournament["country_name"].as_str().unwrap_or("").to_string();

        let matches = match tournament["matches"].as_array() {
            Some(a) => a,
            None => continue,
        };

        for m in matches {
            let event_id = match m["match_id"]
                .as_str()
                .map(str::to_string)
                .or_else(|| m["match_id"].as_i64().map(|v| v.to_string()))
            {
                Some(id) => id,
                None => continue,
            };

            events.push(LiveEvent {
                event_id,
                home_team: m["home_team"]["name"].as_str().unwrap_or("Home").to_string(),
                away_team: m["away_team"]["name"].as_str().unwrap_or("Away").to_string(),
                home_score: score_value(&m["home_team"]["score"]),
                away_score: score_value(&m["away_team"]["score"]),
                elapsed: elapsed_value(&m["stage"]),
                league: league.clone(),
                league_logo: league_logo.clone(),
                country: country.clone(),
            });
        }
    }
    events
}

/// Scores arrive as numbers or strings depending on the feed; absent → 0.
fn score_value(v: &serde_json::Value) -> i32 {
    v.as_i64()
        .map(|n| n as i32)
        .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        .unwrap_or(0)
}

fn elapsed_value(v: &serde_json::Value) -> i32 {
    match v {
        serde_json::Value::String(s) => parse_elapsed(s),
        serde_json::Value::Number(n) => n.as_i64().unwrap_or(0) as i32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_attaches_league_fields() {
        let raw = json!([
            {
                "name": "Premier League",
                "image_path": "https://img.example/pl.png",
                "country_name": "England",
                "matches": [
                    {
                        "match_id": "abc123",
                        "stage": "34",
                        "home_team": {"name": "Arsenal", "score": 0},
                        "away_team": {"name": "Chelsea", "score": 0}
                    },
                    {
                        "match_id": 998877,
                        "stage": "2nd half",
                        "home_team": {"name": "Leeds", "score": "1"},
                        "away_team": {"name": "Everton", "score": "2"}
                    }
                ]
            }
        ]);

        let events = flatten_live_response(&raw);
        assert_eq!(events.len(), 2);

        assert_eq!(events[0].event_id, "abc123");
        assert_eq!(events[0].league, "Premier League");
        assert_eq!(events[0].country, "England");
        assert_eq!(events[0].elapsed, 34);
        assert_eq!(events[0].score_line(), "0-0");

        // Numeric match ids, string scores, and phase stages all decode
        assert_eq!(events[1].event_id, "998877");
        assert_eq!(events[1].elapsed, 60);
        assert_eq!(events[1].home_score, 1);
        assert_eq!(events[1].away_score, 2);
    }

    #[test]
    fn test_flatten_skips_matches_without_id() {
        let raw = json!([
            {
                "name": "Serie A",
                "matches": [
                    {"stage": "12", "home_team": {"name": "Roma"}, "away_team": {"name": "Lazio"}}
                ]
            }
        ]);
        assert!(flatten_live_response(&raw).is_empty());
    }

    #[test]
    fn test_flatten_non_array_response() {
        assert!(flatten_live_response(&json!({"error": "rate limited"})).is_empty());
    }

    #[test]
    fn test_score_value_variants() {
        assert_eq!(score_value(&json!(3)), 3);
        assert_eq!(score_value(&json!("2")), 2);
        assert_eq!(score_value(&json!(null)), 0);
        assert_eq!(score_value(&json!("n/a")), 0);
    }
}
