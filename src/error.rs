use thiserror::Error;

/// Failures talking to the live-score feed.
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("feed returned HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("failed to decode feed payload: {0}")]
    Decode(String),
}
