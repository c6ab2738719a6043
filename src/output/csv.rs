// src/output/csv.rs
//! CSV output handler

use crate::output::OutputHandler;
use crate::types::ProbeReport;
use async_trait::async_trait;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Mutex;

/// Flat row layout; aborted probes leave the timing columns empty
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    status: &'static str,
    category: &'static str,
    first: Option<i64>,
    second: Option<i64>,
    start_time: String,
    end_time: Option<String>,
    duration_ms: Option<u64>,
    success: bool,
    error_detail: Option<&'a str>,
}

impl<'a> CsvRow<'a> {
    fn from_report(report: &'a ProbeReport) -> Self {
        match report {
            ProbeReport::Completed(o) => Self {
                status: "completed",
                category: o.category.label(),
                first: Some(o.range.first),
                second: Some(o.range.second),
                start_time: o.start_time.to_rfc3339(),
                end_time: Some(o.end_time.to_rfc3339()),
                duration_ms: Some(o.duration.as_millis() as u64),
                success: o.success,
                error_detail: o.error_detail.as_deref(),
            },
            ProbeReport::Aborted(a) => Self {
                status: "aborted",
                category: a.category.label(),
                first: None,
                second: None,
                start_time: a.at.to_rfc3339(),
                end_time: None,
                duration_ms: None,
                success: false,
                error_detail: Some(a.error_detail.as_str()),
            },
        }
    }
}

/// CSV output handler; the header is written with the first row
pub struct CsvOutput {
    writer: Mutex<csv::Writer<Box<dyn Write + Send>>>,
}

impl CsvOutput {
    pub fn new() -> Self {
        Self::to_writer(Box::new(io::stdout()))
    }

    pub fn to_file(file: std::fs::File) -> Self {
        Self::to_writer(Box::new(file))
    }

    pub fn to_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(csv::Writer::from_writer(writer)),
        }
    }
}

impl Default for CsvOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputHandler for CsvOutput {
    async fn emit(&self, report: &ProbeReport) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("CSV writer lock poisoned"))?;
        writer.serialize(CsvRow::from_report(report))?;
        writer.flush()?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("CSV writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support;
    use std::io::{Read, Seek, SeekFrom};

    #[tokio::test]
    async fn test_csv_output() {
        let mut file = tempfile::tempfile().unwrap();
        let handler = CsvOutput::to_file(file.try_clone().unwrap());

        handler.emit(&test_support::completed(false)).await.unwrap();
        handler.emit(&test_support::aborted()).await.unwrap();

        let mut contents = String::new();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.read_to_string(&mut contents).unwrap();

        let mut reader = csv::Reader::from_reader(contents.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "status");
        assert_eq!(&headers[6], "duration_ms");

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "OLD");
        assert_eq!(&rows[0][2], "1200");
        assert_eq!(&rows[0][6], "123");
        // detail contains a comma and must survive quoting
        assert_eq!(&rows[0][8], "HTTP 503: overloaded, try later");
        assert_eq!(&rows[1][0], "aborted");
        assert_eq!(&rows[1][6], "");
    }
}
