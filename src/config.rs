// src/config.rs

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::ct_log::client::DEFAULT_TIMEOUT;
use crate::scheduler::DEFAULT_INTERVAL;

#[derive(Debug, Deserialize, Clone)]
pub struct ProbeConfig {
    /// Base URL of the CT log; may instead come from --log-url
    #[serde(default)]
    pub log_url: Option<String>,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Unset means no cap on concurrently running probes
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

fn default_interval_secs() -> u64 { DEFAULT_INTERVAL.as_secs() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT.as_secs() }

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            log_url: None,
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
            max_in_flight: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StatsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_stats_interval_secs")]
    pub interval_secs: u64,
}

fn default_stats_interval_secs() -> u64 { 60 }

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_secs: default_stats_interval_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the scheduler or client cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.probe.interval_secs == 0 {
            anyhow::bail!("probe.interval_secs must be greater than 0");
        }
        if self.probe.timeout_secs == 0 {
            anyhow::bail!("probe.timeout_secs must be greater than 0");
        }
        if self.probe.max_in_flight == Some(0) {
            anyhow::bail!("probe.max_in_flight must be greater than 0 when set");
        }
        if self.stats.enabled && self.stats.interval_secs == 0 {
            anyhow::bail!("stats.interval_secs must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_config_from_valid_toml() {
        let temp_file = write_config(
            r#"
[probe]
log_url = "https://ct.example.com/2025h1"
interval_secs = 2
timeout_secs = 10
max_in_flight = 64

[logging]
level = "debug"

[stats]
enabled = true
interval_secs = 15
        "#,
        );

        let config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(config.probe.log_url.as_deref(), Some("https://ct.example.com/2025h1"));
        assert_eq!(config.probe.interval_secs, 2);
        assert_eq!(config.probe.timeout_secs, 10);
        assert_eq!(config.probe.max_in_flight, Some(64));
        assert_eq!(config.logging.level, "debug");
        assert!(config.stats.enabled);
        assert_eq!(config.stats.interval_secs, 15);
    }

    #[test]
    fn test_config_empty_uses_defaults() {
        let temp_file = write_config("");

        let config = Config::from_file(temp_file.path()).unwrap();

        assert_eq!(config.probe.log_url, None);
        assert_eq!(config.probe.interval_secs, 1);
        assert_eq!(config.probe.timeout_secs, 30);
        assert_eq!(config.probe.max_in_flight, None);
        assert_eq!(config.logging.level, "info");
        assert!(!config.stats.enabled);
    }

    #[test]
    fn test_config_invalid_toml() {
        let temp_file = write_config("invalid toml content {{{");
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_zero_interval_rejected() {
        let temp_file = write_config("[probe]\ninterval_secs = 0\n");
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_zero_cap_rejected() {
        let temp_file = write_config("[probe]\nmax_in_flight = 0\n");
        assert!(Config::from_file(temp_file.path()).is_err());
    }

    #[test]
    fn test_config_nonexistent_file() {
        let result = Config::from_file(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }
}
