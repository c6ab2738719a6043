// src/ct_log/types.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The part of a get-sth response the probe cares about
///
/// Every other field of the signed tree head is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeHead {
    pub tree_size: i64,
}

/// Base URL of the CT log under test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTarget {
    base_url: String,
}

impl LogTarget {
    /// Validate a base URL; trailing slashes are stripped so endpoint paths join cleanly
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_end_matches('/');
        let url = Url::parse(trimmed).with_context(|| format!("Invalid log URL '{}'", raw))?;

        match url.scheme() {
            "http" | "https" => {}
            other => anyhow::bail!("Unsupported log URL scheme '{}' (expected http or https)", other),
        }

        if url.host_str().is_none() {
            anyhow::bail!("Log URL '{}' has no host", raw);
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    /// Endpoint: {base_url}/ct/v1/get-sth
    pub fn sth_url(&self) -> String {
        format!("{}/ct/v1/get-sth", self.base_url)
    }

    /// Endpoint: {base_url}/ct/v1/get-sth-consistency?first={first}&second={second}
    pub fn consistency_url(&self, first: i64, second: i64) -> String {
        format!(
            "{}/ct/v1/get-sth-consistency?first={}&second={}",
            self.base_url, first, second
        )
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url)
    }
}
