use crate::error::{AppError, Result};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Sentinel the scraper writes when a cell had no value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Upper bound on competition suggestions offered while typing.
pub const MAX_COMPETITION_SUGGESTIONS: usize = 10;

/// Event loop poll interval (milliseconds). Data is pulled on demand only.
pub const TICK_RATE_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    /// Scraper backend base URL, no trailing slash (BACKEND_API_URL)
    pub backend_url: String,
    pub log_level: String,
    /// Log destination; the terminal belongs to the UI (LOG_FILE)
    pub log_file: String,
    /// Per-request timeout. Scrapes drive a headless browser and are slow (HTTP_TIMEOUT_SECS)
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            backend_url: normalize_base_url(
                &std::env::var("BACKEND_API_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
            ),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_file: std::env::var("LOG_FILE").unwrap_or_else(|_| "dashboard.log".to_string()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .map_err(|_| AppError::Config("HTTP_TIMEOUT_SECS must be a whole number of seconds".to_string()))?,
        })
    }
}

fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BACKEND_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        assert_eq!(normalize_base_url("http://host:5000/"), "http://host:5000");
    }

    #[test]
    fn blank_url_falls_back_to_default() {
        assert_eq!(normalize_base_url("   "), DEFAULT_BACKEND_URL);
    }
}
