// src/probe/new_range.rs
use async_trait::async_trait;
use chrono::Utc;
use tracing::warn;

use super::executor::ProbeExecutor;
use super::Prober;
use crate::error::ProbeError;
use crate::types::{AbortedProbe, ProbeCategory, ProbeRange, ProbeReport};

/// Probes the window just below the log's current tree size
pub struct NewRangeProber {
    executor: ProbeExecutor,
}

impl NewRangeProber {
    pub fn new(executor: ProbeExecutor) -> Self {
        Self { executor }
    }

    /// Fetch the tree head and derive the window from it (untimed)
    pub async fn discover_range(&self) -> Result<ProbeRange, ProbeError> {
        let sth = self.executor.client().get_tree_head().await?;
        ProbeRange::below_tree_size(sth.tree_size).ok_or_else(|| {
            ProbeError::Discovery(format!("tree_size {} out of range", sth.tree_size))
        })
    }
}

#[async_trait]
impl Prober for NewRangeProber {
    fn category(&self) -> ProbeCategory {
        ProbeCategory::New
    }

    async fn probe(&self) -> ProbeReport {
        match self.discover_range().await {
            Ok(range) => {
                ProbeReport::Completed(self.executor.execute(ProbeCategory::New, range).await)
            }
            Err(e) => {
                warn!("NEW probe aborted: {}", e);
                ProbeReport::Aborted(AbortedProbe {
                    category: ProbeCategory::New,
                    at: Utc::now(),
                    error_detail: e.to_string(),
                })
            }
        }
    }
}
