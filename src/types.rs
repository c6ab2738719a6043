// src/types.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Width of every consistency-proof window
pub const WINDOW_WIDTH: i64 = 300;

/// Exclusive upper bound for the start of an old-range window
pub const OLD_RANGE_LIMIT: i64 = 10_000;

/// Which end of the log a probe targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeCategory {
    /// Near the left edge of the log
    Old,
    /// Just below the current tree size
    New,
}

impl ProbeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ProbeCategory::Old => "OLD",
            ProbeCategory::New => "NEW",
        }
    }
}

impl fmt::Display for ProbeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `first`/`second` pair sent to get-sth-consistency
///
/// Indices are signed: a new-range window over a log with fewer than
/// 301 entries has a negative `first`, and it is sent as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRange {
    pub first: i64,
    pub second: i64,
}

impl ProbeRange {
    /// Window of fixed width starting at `first`
    pub fn starting_at(first: i64) -> Self {
        Self {
            first,
            second: first + WINDOW_WIDTH,
        }
    }

    /// Window of fixed width ending one below `tree_size`
    ///
    /// `None` when the window would fall outside the i64 range.
    pub fn below_tree_size(tree_size: i64) -> Option<Self> {
        let second = tree_size.checked_sub(1)?;
        let first = second.checked_sub(WINDOW_WIDTH)?;
        Some(Self { first, second })
    }
}

impl fmt::Display for ProbeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "first={}&second={}", self.first, self.second)
    }
}

/// Result of one timed consistency-proof request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeOutcome {
    pub category: ProbeCategory,

    /// Window that was requested
    pub range: ProbeRange,

    /// UTC time immediately before the request was sent
    pub start_time: DateTime<Utc>,

    /// UTC time immediately after the response or failure
    pub end_time: DateTime<Utc>,

    /// Elapsed time, truncated to whole milliseconds
    #[serde(rename = "duration_ms", with = "duration_millis")]
    pub duration: Duration,

    /// True iff the request completed with HTTP 200
    pub success: bool,

    /// Transport error, or status code plus body for non-200 responses
    pub error_detail: Option<String>,
}

/// A probe cycle that ended before its timed request was made
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbortedProbe {
    pub category: ProbeCategory,
    pub at: DateTime<Utc>,
    pub error_detail: String,
}

/// Everything a probe cycle can hand to the output sink
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProbeReport {
    Completed(ProbeOutcome),
    Aborted(AbortedProbe),
}

/// Drop any sub-millisecond remainder (123.7ms becomes 123ms)
pub fn truncate_to_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(elapsed.as_millis() as u64)
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_discards_fraction() {
        let elapsed = Duration::from_micros(123_700);
        assert_eq!(truncate_to_millis(elapsed), Duration::from_millis(123));
    }

    #[test]
    fn test_truncate_sub_millisecond_is_zero() {
        assert_eq!(truncate_to_millis(Duration::from_micros(999)), Duration::ZERO);
    }

    #[test]
    fn test_range_below_tree_size() {
        let range = ProbeRange::below_tree_size(5000).unwrap();
        assert_eq!(range.first, 4699);
        assert_eq!(range.second, 4999);
    }

    #[test]
    fn test_range_below_small_tree_goes_negative() {
        let range = ProbeRange::below_tree_size(100).unwrap();
        assert_eq!(range.second, 99);
        assert_eq!(range.first, -201);
        assert_eq!(range.second - range.first, WINDOW_WIDTH);
    }

    #[test]
    fn test_range_below_extreme_tree_size_is_rejected() {
        assert_eq!(ProbeRange::below_tree_size(i64::MIN), None);
        assert_eq!(ProbeRange::below_tree_size(i64::MIN + 300), None);

        let lowest = ProbeRange::below_tree_size(i64::MIN + 301).unwrap();
        assert_eq!(lowest.first, i64::MIN);
    }

    #[test]
    fn test_range_starting_at() {
        let range = ProbeRange::starting_at(42);
        assert_eq!(range.second, 342);
        assert_eq!(range.to_string(), "first=42&second=342");
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(ProbeCategory::Old.to_string(), "OLD");
        assert_eq!(ProbeCategory::New.label(), "NEW");
    }

    #[test]
    fn test_outcome_serializes_duration_as_millis() {
        let now = Utc::now();
        let report = ProbeReport::Completed(ProbeOutcome {
            category: ProbeCategory::Old,
            range: ProbeRange::starting_at(1),
            start_time: now,
            end_time: now,
            duration: Duration::from_millis(250),
            success: true,
            error_detail: None,
        });

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["category"], "OLD");
        assert_eq!(json["duration_ms"], 250);
    }
}
