// src/output/silent.rs
//! Silent output handler - produces no output

use crate::output::OutputHandler;
use crate::types::ProbeReport;
use async_trait::async_trait;

/// Discards every report
///
/// Used with --silent when only the stats log line is wanted.
pub struct SilentOutput;

#[async_trait]
impl OutputHandler for SilentOutput {
    async fn emit(&self, _report: &ProbeReport) -> anyhow::Result<()> {
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
