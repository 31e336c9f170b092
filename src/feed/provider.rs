use anyhow::Result;
use async_trait::async_trait;

use super::models::{LiveEvent, RawStats};

/// Trait that every live-event feed must implement.
#[async_trait]
pub trait EventFeed: Send + Sync {
    /// Return a snapshot of all currently in-progress matches.
    async fn fetch_live_events(&self) -> Result<Vec<LiveEvent>>;

    /// Return the detailed statistics payload for a single match.
    async fn fetch_event_stats(&self, event_id: &str) -> Result<RawStats>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
