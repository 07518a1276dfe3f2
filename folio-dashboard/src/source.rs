//! Health endpoint client
//!
//! Fetches `/api/health` snapshots. Any transport error, non-success status
//! or body that does not match the snapshot contract is a [`PollError`];
//! callers treat all three the same way (keep the last known values).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Snapshot as served by the kernel (same keys as the kernel's HealthSnapshot)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthPayload {
    pub status: PayloadStatus,
    pub region: String,
    pub uptime: u64,
    pub cpu: u32,
    pub memory: u64,
    pub memory_percent: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadStatus {
    Active,
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("endpoint returned {0}")]
    Status(StatusCode),
    #[error("malformed health payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Anything that can produce a health snapshot for the poller
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn fetch(&self) -> Result<HealthPayload, PollError>;
}

/// HTTP source backed by reqwest
pub struct HttpHealthSource {
    client: reqwest::Client,
    url: String,
}

impl HttpHealthSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PollError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl HealthSource for HttpHealthSource {
    async fn fetch(&self) -> Result<HealthPayload, PollError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PollError::Status(status));
        }

        // decode from bytes so a bad body is reported as Malformed, not Transport
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
