use clap::Parser;
use url::Url;

/// Live football scanner with AI-validated goal alerts
#[derive(Parser, Debug, Clone)]
#[command(name = "goalscout", version, about)]
pub struct Config {
    /// RapidAPI key for the Flashscore4 live feed
    #[arg(long, env = "RAPIDAPI_KEY")]
    pub rapidapi_key: String,

    /// RapidAPI host for the live feed
    #[arg(long, env = "RAPIDAPI_HOST", default_value = "flashscore4.p.rapidapi.com")]
    pub rapidapi_host: String,

    /// Override the feed base URL (defaults to https://<rapidapi-host>)
    #[arg(long, env = "FEED_BASE_URL")]
    pub feed_base_url: Option<String>,

    /// Gemini API key for the advisory analyst
    #[arg(long, env = "GEMINI_API_KEY")]
    pub gemini_api_key: String,

    /// Advisory API base URL
    #[arg(
        long,
        env = "GEMINI_API_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    pub gemini_api_url: String,

    /// Advisory model identifier
    #[arg(long, env = "GEMINI_MODEL", default_value = "gemini-pro")]
    pub gemini_model: String,

    /// Seconds between scan cycles
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "180")]
    pub poll_interval_secs: u64,

    /// Minutes to suppress repeat alerts for the same match
    #[arg(long, env = "COOLDOWN_MINUTES", default_value = "15")]
    pub cooldown_minutes: i64,

    /// Alert only when analyst confidence is strictly above this (0-100)
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value = "75")]
    pub confidence_threshold: u8,

    /// Seconds to back off after a failed scan cycle
    #[arg(long, env = "ERROR_BACKOFF_SECS", default_value = "60")]
    pub error_backoff_secs: u64,

    /// HTTP timeout for all outbound calls, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    /// Milliseconds to pause between advisory calls within one cycle
    #[arg(long, env = "ADVISORY_DELAY_MS", default_value = "500")]
    pub advisory_delay_ms: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        if self.cooldown_minutes <= 0 {
            anyhow::bail!("cooldown_minutes must be positive");
        }
        if self.confidence_threshold > 100 {
            anyhow::bail!("confidence_threshold must be between 0 and 100");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }
        if let Some(base) = &self.feed_base_url {
            Url::parse(base)
                .map_err(|e| anyhow::anyhow!("feed_base_url is not a valid URL: {}", e))?;
        }
        Url::parse(&self.gemini_api_url)
            .map_err(|e| anyhow::anyhow!("gemini_api_url is not a valid URL: {}", e))?;
        Ok(())
    }
}
