//! Retrying HTTP GET primitive.
//!
//! A `Fetcher` issues one liveness GET with a per-request timeout, retrying
//! a bounded number of times with a short pause between attempts. The first
//! attempt that gets a response wins; exhausting all attempts degrades to an
//! absent result rather than an error, so the heartbeat loop never crashes
//! on network failures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::config::PingConfig;
use crate::error::Result;

/// Outcome of one ping: the HTTP status code of the first attempt that got a
/// response, or `None` when every attempt failed.
pub type PingStatus = Option<u16>;

/// The seam between the heartbeat loop and the network: anything that can be
/// probed for liveness.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe the target once, retrying internally as needed.
    async fn probe(&self) -> PingStatus;
}

/// Retrying HTTP GET fetcher.
///
/// Owns the `reqwest::Client` (the connection pool) for the lifetime of one
/// heartbeat loop; dropping the fetcher releases it on every exit path.
#[derive(Debug)]
pub struct Fetcher {
    client: Client,
    url: String,
    max_attempts: u32,
    retry_pause: Duration,
}

impl Fetcher {
    /// Build a fetcher from the endpoint configuration.
    ///
    /// The client applies the per-request timeout; non-2xx responses are
    /// treated as failed attempts (see [`Fetcher::fetch`]).
    pub fn new(config: &PingConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            url: config.url.clone(),
            max_attempts: config.max_attempts,
            retry_pause: config.retry_pause,
        })
    }

    /// Issue the liveness GET, retrying up to the configured attempt count.
    ///
    /// Returns the status code of the first successful attempt immediately.
    /// Timeouts, connection errors, and HTTP error statuses all count as
    /// failed attempts; each failure is logged and followed by the retry
    /// pause before the next attempt.
    pub async fn fetch(&self) -> PingStatus {
        for attempt in 1..=self.max_attempts {
            info!("Fetching {} (attempt {}/{})", self.url, attempt, self.max_attempts);
            match self.try_get().await {
                Ok(status) => return Some(status),
                Err(e) => {
                    error!("Error fetching {} on attempt {}: {}", self.url, attempt, e);
                    tokio::time::sleep(self.retry_pause).await;
                }
            }
        }
        None
    }

    /// One GET attempt. HTTP error statuses are mapped to errors so they
    /// retry like transport failures.
    async fn try_get(&self) -> std::result::Result<u16, reqwest::Error> {
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.status().as_u16())
    }
}

#[async_trait]
impl Probe for Fetcher {
    async fn probe(&self) -> PingStatus {
        self.fetch().await
    }
}
