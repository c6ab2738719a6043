// src/error.rs
//! Error types for the probing path

use std::fmt::Write;
use std::time::Duration;
use thiserror::Error;

/// Errors that end a single probe cycle
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request never produced an HTTP response (DNS, connect, TLS, reset)
    #[error("{0}")]
    Transport(String),

    /// The request exceeded the client timeout
    #[error("request timed out after {}s: {detail}", .after.as_secs())]
    Timeout { after: Duration, detail: String },

    /// The tree head could not be fetched or parsed; no proof request was made
    #[error("{0}")]
    Discovery(String),
}

impl ProbeError {
    /// Classify a reqwest failure, keeping the full source chain as detail
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        let detail = report(err);
        if err.is_timeout() {
            ProbeError::Timeout {
                after: timeout,
                detail,
            }
        } else {
            ProbeError::Transport(detail)
        }
    }
}

/// Render an error together with every `source()` below it
pub fn report(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut s = format!("{}", err);
    while let Some(src) = err.source() {
        let _ = write!(s, ": {}", src);
        err = src;
    }
    s
}
