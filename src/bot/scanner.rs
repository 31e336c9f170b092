use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::cooldown::CooldownRegistry;
use crate::advisory::AdvisoryOracle;
use crate::console::AlertSink;
use crate::feed::{EventFeed, NormalizedStats};
use crate::scout;

/// Per-cycle counters for the operator summary line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub candidates: usize,
    pub alerts: usize,
}

/// Runs one full scan pass over the live feed.
///
/// Per cycle: fetch the live list, drop ineligible and cooled-down matches
/// before any further network calls, fetch and normalize stats for the
/// survivors, run the scout filters, and put each candidate through the
/// advisory gate. Owns the cooldown registry across cycles.
///
/// Every external failure degrades instead of aborting: a dead feed means an
/// empty cycle, a failed stats fetch means baseline stats, a failed advisory
/// call means a skip.
pub struct Scanner {
    feed: Arc<dyn EventFeed>,
    oracle: Arc<dyn AdvisoryOracle>,
    sink: Arc<dyn AlertSink>,
    cooldowns: CooldownRegistry,
    /// Alert only when the analyst plays with confidence strictly above this.
    confidence_threshold: u8,
    /// Pause between successive advisory calls within one cycle.
    advisory_delay: Duration,
}

impl Scanner {
    pub fn new(
        feed: Arc<dyn EventFeed>,
        oracle: Arc<dyn AdvisoryOracle>,
        sink: Arc<dyn AlertSink>,
        cooldowns: CooldownRegistry,
        confidence_threshold: u8,
        advisory_delay: Duration,
    ) -> Self {
        Scanner {
            feed,
            oracle,
            sink,
            cooldowns,
            confidence_threshold,
            advisory_delay,
        }
    }

    /// Execute one scan cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleReport> {
        let mut report = CycleReport::default();

        let events = match self.feed.fetch_live_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!("Live feed fetch failed, ending cycle: {}", e);
                return Ok(report);
            }
        };
        if events.is_empty() {
            info!("No live events found");
            return Ok(report);
        }
        info!("Fetched {} live events from {}", events.len(), self.feed.name());

        self.cooldowns.prune(Utc::now());
        debug!("{} cooldown entries active", self.cooldowns.len());

        for event in &events {
            if !scout::prefilter(event) {
                continue;
            }
            if self.cooldowns.is_suppressed(&event.event_id, Utc::now()) {
                debug!("{} on cooldown, skipping", event.fixture());
                continue;
            }

            // Detailed stats only for matches that survived the cheap checks
            let stats = match self.feed.fetch_event_stats(&event.event_id).await {
                Ok(raw) => NormalizedStats::from_raw(Some(&raw)),
                Err(e) => {
                    warn!("Stats fetch failed for {}: {}", event.event_id, e);
                    NormalizedStats::default()
                }
            };

            let candidate = match scout::evaluate(event, &stats) {
                Some(c) => c,
                None => continue,
            };
            report.candidates += 1;

            info!(
                "Analyzing candidate: {} [{}] at {}'",
                event.fixture(),
                candidate.strategy_code,
                candidate.minute
            );
            let verdict = self.oracle.review(&candidate).await;

            if verdict.approves(self.confidence_threshold) {
                self.cooldowns.record_alert(&event.event_id, Utc::now());
                self.sink.emit(&candidate, &verdict);
                report.alerts += 1;
            } else {
                info!(
                    "Skipped {} (confidence {}%)",
                    event.fixture(),
                    verdict.confidence
                );
            }

            // Keep successive analyst calls apart within one cycle
            tokio::time::sleep(self.advisory_delay).await;
        }

        Ok(report)
    }
}
