//! Pipeline configuration
//!
//! Connection and polling settings for the client. The 5 second polling
//! cadence is fixed-interval with no backoff and no attempt cap; a session
//! ends on completion, failure, or the user leaving the view.

use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

/// Client configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL (e.g., "http://localhost:8000")
    pub api_url: String,

    /// Cadence between status queries for an in-flight job
    pub poll_interval: Duration,
}

impl Config {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - TWINVERSE_API_URL (optional, default: http://localhost:8000)
    /// - POLL_INTERVAL (optional, seconds, default: 5)
    pub fn from_env() -> anyhow::Result<Self> {
        let api_url = std::env::var("TWINVERSE_API_URL")
            .unwrap_or_else(|_| "http://localhost:8000".to_string());

        let poll_interval = std::env::var("POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let config = Self {
            api_url,
            poll_interval,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}
