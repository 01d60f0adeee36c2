use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ThreadscrapeError;

const DEFAULT_GRAPHQL_URL: &str = "https://www.threads.com/graphql/query";

/// Application configuration loaded from environment variables.
/// Nothing is required; every value has a default suitable for local use.
#[derive(Debug, Clone)]
pub struct Config {
    // Web server
    pub web_host: String,
    pub web_port: u16,

    // Remote endpoint
    pub graphql_url: String,
    pub request_timeout: Duration,

    // Paging
    pub max_consecutive_errors: u32,

    // Last submitted search form
    pub draft_path: PathBuf,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first.
    pub fn from_env() -> Result<Self, ThreadscrapeError> {
        dotenvy::dotenv().ok();

        let config = Self::from_vars(|key| std::env::var(key).ok())?;
        config.log_values();
        Ok(config)
    }

    /// Build from an arbitrary key lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ThreadscrapeError> {
        let timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(ThreadscrapeError::Config(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        let max_consecutive_errors: u32 = parse_or(&lookup, "MAX_CONSECUTIVE_ERRORS", 3)?;
        if max_consecutive_errors == 0 {
            return Err(ThreadscrapeError::Config(
                "MAX_CONSECUTIVE_ERRORS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            web_host: lookup("WEB_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            web_port: parse_or(&lookup, "WEB_PORT", 3000)?,
            graphql_url: lookup("THREADS_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            request_timeout: Duration::from_secs(timeout_secs),
            max_consecutive_errors,
            draft_path: lookup("DRAFT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".threadscrape/draft.json")),
        })
    }

    fn log_values(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  WEB_HOST: {}", self.web_host);
        tracing::info!("  WEB_PORT: {}", self.web_port);
        tracing::info!("  THREADS_GRAPHQL_URL: {}", self.graphql_url);
        tracing::info!("  REQUEST_TIMEOUT_SECS: {}", self.request_timeout.as_secs());
        tracing::info!("  MAX_CONSECUTIVE_ERRORS: {}", self.max_consecutive_errors);
        tracing::info!("  DRAFT_PATH: {}", self.draft_path.display());
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ThreadscrapeError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ThreadscrapeError::Config(format!("{key} must be a number: {e}"))),
        None => Ok(default),
    }
}
