// src/ct_log/client.rs
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

use super::types::{LogTarget, TreeHead};
use crate::error::{report, ProbeError};
use crate::types::ProbeRange;

/// Default bound on every request issued by the probe
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the two RFC 6962 endpoints the probe exercises
#[derive(Clone)]
pub struct CtLogClient {
    target: LogTarget,
    http_client: reqwest::Client,
    timeout: Duration,
}

impl CtLogClient {
    /// Create a new CT log client; `timeout` bounds each request end to end
    pub fn new(target: LogTarget, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            target,
            http_client,
            timeout,
        })
    }

    /// Fetch the current tree size
    /// Endpoint: GET {base_url}/ct/v1/get-sth
    ///
    /// Any failure here is a discovery failure. The status code is not
    /// checked: a body that parses is accepted.
    pub async fn get_tree_head(&self) -> Result<TreeHead, ProbeError> {
        let url = self.target.sth_url();

        debug!("Fetching STH from {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                ProbeError::Discovery(format!(
                    "Error getting STH: {}",
                    ProbeError::from_reqwest(&e, self.timeout)
                ))
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            ProbeError::Discovery(format!("Error reading STH body: {}", report(&e)))
        })?;

        let sth: TreeHead = serde_json::from_slice(&body).map_err(|e| {
            ProbeError::Discovery(format!("Error decoding STH (HTTP {}): {}", status.as_u16(), e))
        })?;

        debug!("STH received: tree_size={}", sth.tree_size);

        Ok(sth)
    }

    /// Request a consistency proof; the body is left unread
    /// Endpoint: GET {base_url}/ct/v1/get-sth-consistency?first={first}&second={second}
    pub async fn get_sth_consistency(
        &self,
        range: ProbeRange,
    ) -> Result<reqwest::Response, ProbeError> {
        let url = self.target.consistency_url(range.first, range.second);

        debug!("Requesting consistency proof {} from {}", range, self.target);

        self.http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(&e, self.timeout))
    }
}
