//! AI advisory analyst: the final accept/reject gate for scout candidates.
//!
//! Candidates are summarized into a fixed prompt template and sent to the
//! Gemini `generateContent` endpoint; the reply is parsed into a structured
//! verdict. The policy is fail-closed throughout: a network error, a
//! malformed reply, or an unknown verdict label all collapse to a Skip with
//! zero confidence, so a flaky analyst can never produce a false alert.
//! There is no retry within a cycle; the next scan is the retry mechanism.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scout::Candidate;

/// Advisory client configuration.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

/// Final decision on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Play,
    Skip,
}

/// Structured verdict returned by the analyst.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisoryVerdict {
    pub verdict: Verdict,
    /// 0–100
    pub confidence: u8,
    pub reason: String,
}

impl AdvisoryVerdict {
    fn rejected(reason: &str) -> Self {
        AdvisoryVerdict {
            verdict: Verdict::Skip,
            confidence: 0,
            reason: reason.to_string(),
        }
    }

    /// The alert gate: a Play verdict with confidence strictly above the
    /// threshold. Exactly at the threshold does not alert.
    pub fn approves(&self, threshold: u8) -> bool {
        self.verdict == Verdict::Play && self.confidence > threshold
    }
}

/// Seam for the analyst so the scan loop can be tested offline.
#[async_trait]
pub trait AdvisoryOracle: Send + Sync {
    async fn review(&self, candidate: &Candidate) -> AdvisoryVerdict;
}

// Wire types for the generateContent API.

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct VerdictJson {
    #[serde(default)]
    verdict: String,
    /// Models occasionally return a float here; tolerate it.
    #[serde(default)]
    confidence: f64,
    #[serde(default)]
    reason: String,
}

/// Gemini-backed advisory client.
pub struct AdvisoryClient {
    config: AdvisoryConfig,
    http: Client,
}

impl AdvisoryClient {
    pub fn new(config: AdvisoryConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(AdvisoryClient { config, http })
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                max_output_tokens: 200,
            },
        };

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Advisory request failed")?;

        if !resp.status().is_success() {
            anyhow::bail!("Advisory API error: {}", resp.status());
        }

        let body: GenerateResponse = resp
            .json()
            .await
            .context("Failed to decode advisory response")?;

        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .unwrap_or_default();

        if text.is_empty() {
            anyhow::bail!("Advisory response contained no text");
        }
        debug!("Advisory reply: {} bytes", text.len());
        Ok(text)
    }
}

#[async_trait]
impl AdvisoryOracle for AdvisoryClient {
    async fn review(&self, candidate: &Candidate) -> AdvisoryVerdict {
        let prompt = build_prompt(candidate);
        match self.generate(&prompt).await {
            Ok(raw) => parse_verdict(&raw),
            Err(e) => {
                warn!("Advisory call failed for {}: {:#}", candidate.event_id, e);
                AdvisoryVerdict::rejected("Analyst unavailable")
            }
        }
    }
}

/// Fixed prompt template. The analyst is asked for a bare JSON record so
/// the reply stays machine-parseable.
fn build_prompt(c: &Candidate) -> String {
    format!(
        r#"Act as a Professional Football Analyst.
STRATEGY: {strategy} ({code})
MATCH: {home} vs {away}
TIME: {minute}' | SCORE: {score}
LEAGUE: {league}
STATS:
- DA/min: {da}
- Shots (Total/Target): {shots}/{sot}
- Corners: {corners}
- xG: {xg}

Based on the stats, is a goal imminent?
OUTPUT JSON ONLY:
{{
  "verdict": "PLAY" or "SKIP",
  "confidence": (0-100),
  "reason": "One short sentence."
}}"#,
        strategy = c.strategy,
        code = c.strategy_code,
        home = c.home,
        away = c.away,
        minute = c.minute,
        score = c.score,
        league = c.league,
        da = c.summary.da_per_min,
        shots = c.summary.total_shots,
        sot = c.summary.shots_on_target,
        corners = c.summary.corners,
        xg = c.summary.xg,
    )
}

/// Strip the Markdown code fences models sometimes wrap around their JSON.
fn extract_json_block(raw: &str) -> &str {
    let trimmed = raw.trim();

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let block = after[..end].trim();
            if block.starts_with('{') {
                return block;
            }
        }
    }
    trimmed
}

/// Parse the analyst's reply. Anything that is not a well-formed PLAY
/// verdict collapses to Skip with zero confidence.
fn parse_verdict(raw: &str) -> AdvisoryVerdict {
    let json = extract_json_block(raw);
    match serde_json::from_str::<VerdictJson>(json) {
        Ok(parsed) => {
            let verdict = if parsed.verdict.trim().eq_ignore_ascii_case("play") {
                Verdict::Play
            } else {
                Verdict::Skip
            };
            AdvisoryVerdict {
                verdict,
                confidence: parsed.confidence.clamp(0.0, 100.0).round() as u8,
                reason: if parsed.reason.is_empty() {
                    "No reason provided".to_string()
                } else {
                    parsed.reason
                },
            }
        }
        Err(e) => {
            warn!("Failed to parse advisory reply, defaulting to skip: {}", e);
            AdvisoryVerdict::rejected("Unparsable analyst reply")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scout::filters::{Candidate, StatsSummary, FIRST_HALF_SNIPER, FIRST_HALF_SNIPER_CODE};

    fn sample_candidate() -> Candidate {
        Candidate {
            strategy: FIRST_HALF_SNIPER,
            strategy_code: FIRST_HALF_SNIPER_CODE,
            event_id: "ev1".into(),
            home: "Arsenal".into(),
            away: "Chelsea".into(),
            minute: 28,
            score: "0-0".into(),
            league: "Premier League".into(),
            summary: StatsSummary {
                total_shots: 9,
                shots_on_target: 4,
                da_per_min: 1.32,
                corners: 5,
                xg: 1.08,
            },
            trigger_reason: None,
        }
    }

    #[test]
    fn test_parse_bare_json() {
        let v = parse_verdict(r#"{"verdict": "PLAY", "confidence": 82, "reason": "Sustained pressure."}"#);
        assert_eq!(v.verdict, Verdict::Play);
        assert_eq!(v.confidence, 82);
        assert_eq!(v.reason, "Sustained pressure.");
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"verdict\": \"SKIP\", \"confidence\": 40, \"reason\": \"Too quiet.\"}\n```";
        let v = parse_verdict(raw);
        assert_eq!(v.verdict, Verdict::Skip);
        assert_eq!(v.confidence, 40);
    }

    #[test]
    fn test_parse_anonymous_fence() {
        let raw = "```\n{\"verdict\": \"play\", \"confidence\": 90, \"reason\": \"ok\"}\n```";
        let v = parse_verdict(raw);
        assert_eq!(v.verdict, Verdict::Play);
        assert_eq!(v.confidence, 90);
    }

    #[test]
    fn test_parse_malformed_is_fail_closed() {
        let v = parse_verdict("The match looks promising, I'd say go for it!");
        assert_eq!(v.verdict, Verdict::Skip);
        assert_eq!(v.confidence, 0);
    }

    #[test]
    fn test_parse_unknown_verdict_label() {
        let v = parse_verdict(r#"{"verdict": "MAYBE", "confidence": 99, "reason": "?"}"#);
        assert_eq!(v.verdict, Verdict::Skip);
    }

    #[test]
    fn test_parse_clamps_confidence() {
        let v = parse_verdict(r#"{"verdict": "PLAY", "confidence": 150, "reason": "!"}"#);
        assert_eq!(v.confidence, 100);
        let v = parse_verdict(r#"{"verdict": "PLAY", "confidence": -3, "reason": "!"}"#);
        assert_eq!(v.confidence, 0);
    }

    #[test]
    fn test_gate_is_strict() {
        let mut v = AdvisoryVerdict {
            verdict: Verdict::Play,
            confidence: 75,
            reason: String::new(),
        };
        assert!(!v.approves(75));
        v.confidence = 76;
        assert!(v.approves(75));
        v.verdict = Verdict::Skip;
        v.confidence = 100;
        assert!(!v.approves(75));
    }

    #[test]
    fn test_prompt_contains_candidate_fields() {
        let prompt = build_prompt(&sample_candidate());
        assert!(prompt.contains("First Half Sniper (IY_05)"));
        assert!(prompt.contains("Arsenal vs Chelsea"));
        assert!(prompt.contains("28' | SCORE: 0-0"));
        assert!(prompt.contains("DA/min: 1.32"));
        assert!(prompt.contains("Shots (Total/Target): 9/4"));
        assert!(prompt.contains("OUTPUT JSON ONLY"));
    }

    #[test]
    fn test_extract_json_block_passthrough() {
        assert_eq!(extract_json_block("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
