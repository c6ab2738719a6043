// src/output/human.rs
//! Human-readable colored terminal output

use crate::output::{format_timestamp, OutputHandler};
use crate::types::ProbeReport;
use async_trait::async_trait;
use colored::Colorize;
use std::io::{self, Write};
use std::sync::Mutex;

/// One line per report, colored when writing to a terminal
pub struct HumanOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    use_colors: bool,
}

impl HumanOutput {
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(Box::new(io::stdout())),
            use_colors: is_terminal::is_terminal(std::io::stdout()),
        }
    }

    pub fn to_file(file: std::fs::File) -> Self {
        Self {
            writer: Mutex::new(Box::new(file)),
            use_colors: false, // No colors when writing to file
        }
    }

    /// Plain rendering:
    /// `OLD latency:    123ms, Start: ..., End: ..., err=HTTP 503: ...`
    pub fn format_line(report: &ProbeReport) -> String {
        match report {
            ProbeReport::Completed(o) => format!(
                "{} latency: {:>8}, Start: {}, End: {}, err={}",
                o.category,
                format!("{}ms", o.duration.as_millis()),
                format_timestamp(&o.start_time),
                format_timestamp(&o.end_time),
                o.error_detail.as_deref().unwrap_or("<nil>")
            ),
            ProbeReport::Aborted(a) => format!(
                "{} aborted at {}: {}",
                a.category,
                format_timestamp(&a.at),
                a.error_detail
            ),
        }
    }

    fn format_colored(report: &ProbeReport) -> String {
        match report {
            ProbeReport::Completed(o) => {
                let latency = format!("{:>8}", format!("{}ms", o.duration.as_millis()));
                let (label, err) = if o.success {
                    (o.category.label().green().bold(), "<nil>".dimmed())
                } else {
                    (
                        o.category.label().red().bold(),
                        o.error_detail.as_deref().unwrap_or_default().red(),
                    )
                };
                format!(
                    "{} latency: {}, {} {}, {} {}, err={}",
                    label,
                    latency.cyan(),
                    "Start:".dimmed(),
                    format_timestamp(&o.start_time),
                    "End:".dimmed(),
                    format_timestamp(&o.end_time),
                    err
                )
            }
            ProbeReport::Aborted(a) => format!(
                "{} {} {}: {}",
                a.category.label().yellow().bold(),
                "aborted at".dimmed(),
                format_timestamp(&a.at),
                a.error_detail.yellow()
            ),
        }
    }
}

impl Default for HumanOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OutputHandler for HumanOutput {
    async fn emit(&self, report: &ProbeReport) -> anyhow::Result<()> {
        let line = if self.use_colors {
            Self::format_colored(report)
        } else {
            Self::format_line(report)
        };

        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer lock poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }

    async fn flush(&self) -> anyhow::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("output writer lock poisoned"))?;
        writer.flush()?;
        Ok(())
    }
}
