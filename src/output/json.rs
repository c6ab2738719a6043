// src/output/json.rs
//! JSON Lines (JSONL) output handler

use crate::output::OutputHandler;
use crate::types::ProbeReport;
use async_trait::async_trait;
use std::io::{self, Write};
use std::sync::Mutex;

/// Outputs one JSON object per report (JSONL/NDJSON format)
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonOutput {
    pub fn new() -> Self {
        Self::to_writer(Box::new(io::stdout()))
    }

    pub fn to_file(file: std::fs::File) -> Self {
        Self::to_writer(Box::new(file))
    }

    pub fn to_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputHandler for JsonOutput {
    async fn emit(&self, report: &ProbeReport) -> anyhow::Result<()> {
        let json = serde_json::to_string(report)?;

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("JSON writer lock poisoned"))?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("JSON writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
