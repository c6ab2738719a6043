// src/output/mod.rs
//! Output handling for probe reports
//!
//! Several handlers can be active at once; each receives every report.

use crate::types::ProbeReport;
use async_trait::async_trait;
use std::sync::Arc;

pub mod csv;
pub mod human;
pub mod json;
pub mod silent;

/// Trait for sinks that receive finished probe cycles
#[async_trait]
pub trait OutputHandler: Send + Sync {
    /// Emit one completed or aborted probe
    async fn emit(&self, report: &ProbeReport) -> anyhow::Result<()>;

    /// Flush any buffered output
    async fn flush(&self) -> anyhow::Result<()>;
}

/// Manager that dispatches reports to multiple handlers
pub struct OutputManager {
    handlers: Vec<Arc<dyn OutputHandler>>,
}

impl OutputManager {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn OutputHandler>) {
        self.handlers.push(handler);
    }

    /// Emit a report to all handlers
    ///
    /// A failing handler is logged and skipped. An error is returned only
    /// when the sole handler failed.
    pub async fn emit(&self, report: &ProbeReport) -> anyhow::Result<()> {
        let mut last_error = None;

        for handler in &self.handlers {
            if let Err(e) = handler.emit(report).await {
                tracing::warn!("Output handler error: {}", e);
                last_error = Some(e);
            }
        }

        if let Some(err) = last_error {
            if self.handlers.len() == 1 {
                return Err(err);
            }
        }

        Ok(())
    }

    pub async fn flush(&self) -> anyhow::Result<()> {
        for handler in &self.handlers {
            handler.flush().await?;
        }
        Ok(())
    }
}

impl Default for OutputManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Timestamp layout shared by the text handlers
pub(crate) fn format_timestamp(ts: &chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.3f UTC").to_string()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::{AbortedProbe, ProbeCategory, ProbeOutcome, ProbeRange, ProbeReport};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    pub fn completed(success: bool) -> ProbeReport {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        ProbeReport::Completed(ProbeOutcome {
            category: ProbeCategory::Old,
            range: ProbeRange::starting_at(1200),
            start_time: start,
            end_time: start + chrono::Duration::milliseconds(123),
            duration: Duration::from_millis(123),
            success,
            error_detail: (!success).then(|| "HTTP 503: overloaded, try later".to_string()),
        })
    }

    pub fn aborted() -> ProbeReport {
        ProbeReport::Aborted(AbortedProbe {
            category: ProbeCategory::New,
            at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 1).unwrap(),
            error_detail: "Error decoding STH (HTTP 200): expected value at line 1 column 1".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct FailingOutput;

    #[async_trait]
    impl OutputHandler for FailingOutput {
        async fn emit(&self, _report: &ProbeReport) -> anyhow::Result<()> {
            Err(anyhow!("sink closed"))
        }

        async fn flush(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_output_manager_no_handlers() {
        let manager = OutputManager::new();
        assert!(manager.emit(&test_support::completed(true)).await.is_ok());
    }

    #[tokio::test]
    async fn test_output_manager_with_handlers() {
        let mut manager = OutputManager::new();
        manager.add_handler(Arc::new(silent::SilentOutput));

        assert!(manager.emit(&test_support::aborted()).await.is_ok());
        assert!(manager.flush().await.is_ok());
    }

    #[tokio::test]
    async fn test_single_failing_handler_reports_error() {
        let mut manager = OutputManager::new();
        manager.add_handler(Arc::new(FailingOutput));

        assert!(manager.emit(&test_support::completed(false)).await.is_err());
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_block_others() {
        let mut manager = OutputManager::new();
        manager.add_handler(Arc::new(FailingOutput));
        manager.add_handler(Arc::new(silent::SilentOutput));

        assert!(manager.emit(&test_support::completed(false)).await.is_ok());
    }
}
