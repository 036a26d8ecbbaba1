//! Endpoint configuration for the heartbeat loop.
//!
//! The target endpoint and all timing parameters are fixed constants; a
//! `PingConfig` is built once at process start and never mutated.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BeatError, Result};

/// Endpoint polled by the heartbeat loop.
pub const DEFAULT_URL: &str = "https://www.example.com";
/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;
/// Pause between heartbeat iterations in seconds.
pub const INTERVAL_SECS: u64 = 5;
/// Maximum GET attempts per ping.
pub const MAX_ATTEMPTS: u32 = 3;
/// Pause between failed attempts in milliseconds. Much shorter than the
/// request timeout and independent of the loop interval: failed attempts
/// retry in a rapid burst within one iteration.
pub const RETRY_PAUSE_MS: u64 = 10;

/// Immutable endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PingConfig {
    /// Target URL for the liveness GET.
    pub url: String,
    /// Timeout applied to each individual request.
    pub request_timeout: Duration,
    /// Pause between heartbeat iterations.
    pub interval: Duration,
    /// Maximum GET attempts per ping before giving up.
    pub max_attempts: u32,
    /// Pause between failed attempts within one ping.
    pub retry_pause: Duration,
}

impl Default for PingConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            interval: Duration::from_secs(INTERVAL_SECS),
            max_attempts: MAX_ATTEMPTS,
            retry_pause: Duration::from_millis(RETRY_PAUSE_MS),
        }
    }
}

impl PingConfig {
    /// Default configuration pointed at a different URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Check the invariants the fetcher relies on: non-empty URL, positive
    /// request timeout, at least one attempt.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(BeatError::Config("target URL must not be empty".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(BeatError::Config(
                "request timeout must be positive".into(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(BeatError::Config(
                "max attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
