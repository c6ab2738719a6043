// src/cli.rs
use clap::Parser;

use crate::config::Config;

/// ct-latency-probe: Certificate Transparency consistency-proof prober
///
/// Probes a CT log's get-sth-consistency endpoint once per interval, near the
/// start of the log and just below its current size, and reports latency and
/// success for each request.
#[derive(Parser, Debug, Clone)]
#[command(name = "ct-latency-probe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    // ===== Target & Configuration =====
    /// Base URL of the CT log under test (overrides the config file)
    #[arg(short = 'u', long = "log-url")]
    pub log_url: Option<String>,

    /// Path to optional TOML config file
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    // ===== Probing =====
    /// Seconds between probe rounds
    #[arg(long = "interval")]
    pub interval: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Maximum number of probes allowed in flight at once
    #[arg(long = "max-in-flight")]
    pub max_in_flight: Option<usize>,

    // ===== Output Format =====
    /// Output reports in JSONL format
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Output reports in CSV format
    #[arg(long = "csv")]
    pub csv: bool,

    /// Suppress per-probe output
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Write output to file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,

    // ===== Statistics =====
    /// Periodically log probe counters
    #[arg(long = "stats")]
    pub stats: bool,

    /// Stats log interval in seconds
    #[arg(long = "stats-interval")]
    pub stats_interval: Option<u64>,

    // ===== Logging =====
    /// Verbose logging (set log level to debug)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Quiet logging (set log level to warn)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Cli {
    /// Validate flag combinations and return errors for invalid usage
    pub fn validate(&self) -> anyhow::Result<()> {
        let format_count = [self.json, self.csv, self.silent]
            .iter()
            .filter(|&&x| x)
            .count();

        if format_count > 1 {
            anyhow::bail!(
                "Cannot specify multiple output formats. \
                Choose one of: --json, --csv, or --silent"
            );
        }

        if self.silent && self.output.is_some() {
            anyhow::bail!("Cannot use --silent with --output: nothing would be written");
        }

        if self.interval == Some(0) {
            anyhow::bail!("--interval must be greater than 0");
        }

        if self.timeout == Some(0) {
            anyhow::bail!("--timeout must be greater than 0");
        }

        if self.max_in_flight == Some(0) {
            anyhow::bail!("--max-in-flight must be greater than 0");
        }

        if self.stats_interval == Some(0) {
            anyhow::bail!("--stats-interval must be greater than 0");
        }

        if self.verbose && self.quiet {
            anyhow::bail!("Cannot specify both --verbose and --quiet");
        }

        Ok(())
    }

    /// Apply CLI overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ref url) = self.log_url {
            config.probe.log_url = Some(url.clone());
        }
        if let Some(interval) = self.interval {
            config.probe.interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if let Some(max) = self.max_in_flight {
            config.probe.max_in_flight = Some(max);
        }
        if self.stats {
            config.stats.enabled = true;
        }
        if let Some(interval) = self.stats_interval {
            config.stats.interval_secs = interval;
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else if self.csv {
            OutputFormat::Csv
        } else if self.silent {
            OutputFormat::Silent
        } else {
            OutputFormat::Human
        }
    }

    /// Log level from verbose/quiet flags, falling back to the config value
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            configured
        }
    }
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable colored text output (default)
    Human,
    /// JSON Lines format (one JSON object per line)
    Json,
    /// CSV format
    Csv,
    /// No per-probe output
    Silent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_url_flag() {
        let cli = Cli::parse_from(["ct-latency-probe", "--log-url", "https://ct.example.com"]);
        assert_eq!(cli.log_url.as_deref(), Some("https://ct.example.com"));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn test_json_output_format() {
        let cli = Cli::parse_from(["ct-latency-probe", "--json"]);
        assert_eq!(cli.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_csv_output_format() {
        let cli = Cli::parse_from(["ct-latency-probe", "--csv"]);
        assert_eq!(cli.output_format(), OutputFormat::Csv);
    }

    #[test]
    fn test_default_is_human() {
        let cli = Cli::parse_from(["ct-latency-probe"]);
        assert_eq!(cli.output_format(), OutputFormat::Human);
    }

    #[test]
    fn test_multiple_formats_invalid() {
        let cli = Cli::parse_from(["ct-latency-probe", "--json", "--csv"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_interval_invalid() {
        let cli = Cli::parse_from(["ct-latency-probe", "--interval", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_verbose_and_quiet_invalid() {
        let cli = Cli::parse_from(["ct-latency-probe", "--verbose", "--quiet"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_valid_combination() {
        let cli = Cli::parse_from(["ct-latency-probe", "--json", "--stats", "-o", "out.jsonl"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_overrides_win_over_config() {
        let cli = Cli::parse_from([
            "ct-latency-probe",
            "-u",
            "https://cli.example.com",
            "--timeout",
            "5",
            "--max-in-flight",
            "100",
            "--stats",
        ]);
        let mut config = Config::default();
        config.probe.log_url = Some("https://file.example.com".to_string());

        cli.apply_overrides(&mut config);

        assert_eq!(config.probe.log_url.as_deref(), Some("https://cli.example.com"));
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(config.probe.interval_secs, 1);
        assert_eq!(config.probe.max_in_flight, Some(100));
        assert!(config.stats.enabled);
    }

    #[test]
    fn test_log_level() {
        let cli = Cli::parse_from(["ct-latency-probe", "--verbose"]);
        assert_eq!(cli.log_level("info"), "debug");

        let cli = Cli::parse_from(["ct-latency-probe", "--quiet"]);
        assert_eq!(cli.log_level("info"), "warn");

        let cli = Cli::parse_from(["ct-latency-probe"]);
        assert_eq!(cli.log_level("trace"), "trace");
    }
}
