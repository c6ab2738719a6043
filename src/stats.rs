// src/stats.rs
//! Process-wide probe counters
//!
//! Purely observational: nothing in the probing path reads these back.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::types::ProbeReport;

/// Thread-safe statistics collector
#[derive(Clone)]
pub struct StatsCollector {
    launched: Arc<AtomicU64>,
    in_flight: Arc<AtomicU64>,
    succeeded: Arc<AtomicU64>,
    failed: Arc<AtomicU64>,
    aborted: Arc<AtomicU64>,
    skipped: Arc<AtomicU64>,
    start_time: Instant,
}

/// Snapshot of statistics at a point in time
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    pub launched: u64,
    pub in_flight: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub aborted: u64,
    pub skipped: u64,
    pub uptime_secs: u64,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            launched: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicU64::new(0)),
            succeeded: Arc::new(AtomicU64::new(0)),
            failed: Arc::new(AtomicU64::new(0)),
            aborted: Arc::new(AtomicU64::new(0)),
            skipped: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    /// A probe task was spawned; the guard must live inside that task
    pub fn probe_started(&self) -> InFlightGuard {
        self.launched.fetch_add(1, Ordering::Relaxed);
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        InFlightGuard {
            stats: self.clone(),
            finished: false,
        }
    }

    fn record(&self, report: &ProbeReport) {
        let counter = match report {
            ProbeReport::Completed(outcome) if outcome.success => &self.succeeded,
            ProbeReport::Completed(_) => &self.failed,
            ProbeReport::Aborted(_) => &self.aborted,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// A probe was not launched because the in-flight cap was reached
    pub fn probe_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            launched: self.launched.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_stats(&self) -> String {
        let s = self.snapshot();
        format!(
            "{} launched | {} in flight | {} ok | {} failed | {} aborted | {} skipped | uptime: {}",
            s.launched,
            s.in_flight,
            s.succeeded,
            s.failed,
            s.aborted,
            s.skipped,
            Self::format_uptime(s.uptime_secs)
        )
    }

    pub fn format_uptime(secs: u64) -> String {
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        let seconds = secs % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}

/// Keeps a launched probe counted as in flight until dropped
///
/// Dropped without `finish` (the task panicked or was aborted), the probe
/// is counted as failed.
pub struct InFlightGuard {
    stats: StatsCollector,
    finished: bool,
}

impl InFlightGuard {
    /// Record how the probe ended
    pub fn finish(mut self, report: &ProbeReport) {
        self.finished = true;
        self.stats.record(report);
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.stats.in_flight.fetch_sub(1, Ordering::Relaxed);
        if !self.finished {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}
