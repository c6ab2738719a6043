// src/probe/executor.rs
use chrono::Utc;
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::ct_log::CtLogClient;
use crate::error::report;
use crate::types::{truncate_to_millis, ProbeCategory, ProbeOutcome, ProbeRange};

/// Times one get-sth-consistency request and classifies the result
#[derive(Clone)]
pub struct ProbeExecutor {
    client: Arc<CtLogClient>,
}

impl ProbeExecutor {
    pub fn new(client: Arc<CtLogClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &CtLogClient {
        &self.client
    }

    pub async fn execute(&self, category: ProbeCategory, range: ProbeRange) -> ProbeOutcome {
        let start_time = Utc::now();
        let started = Instant::now();
        let result = self.client.get_sth_consistency(range).await;
        let elapsed = started.elapsed();
        let end_time = Utc::now();

        let (success, error_detail) = match result {
            Ok(response) if response.status() == StatusCode::OK => (true, None),
            Ok(response) => (false, Some(describe_error_response(response).await)),
            Err(e) => (false, Some(e.to_string())),
        };

        debug!(
            "{} probe {} finished in {:?} (success={})",
            category, range, elapsed, success
        );

        ProbeOutcome {
            category,
            range,
            start_time,
            end_time,
            duration: truncate_to_millis(elapsed),
            success,
            error_detail,
        }
    }
}

/// Build "HTTP {code}: {body}", falling back to "HTTP {code}" if the body is unreadable
async fn describe_error_response(response: reqwest::Response) -> String {
    let status = response.status().as_u16();
    match response.text().await {
        Ok(body) => format!("HTTP {}: {}", status, body),
        Err(e) => {
            warn!("error reading error body (HTTP {}): {}", status, report(&e));
            format!("HTTP {}", status)
        }
    }
}
