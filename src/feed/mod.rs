pub mod flashscore;
pub mod models;
pub mod provider;
pub mod stats;

pub use flashscore::Flashscore;
pub use models::{parse_elapsed, LiveEvent, RawStats};
pub use provider::EventFeed;
pub use stats::NormalizedStats;
