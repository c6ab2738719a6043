// src/probe/old_range.rs
use async_trait::async_trait;
use rand::Rng;

use super::executor::ProbeExecutor;
use super::Prober;
use crate::types::{ProbeCategory, ProbeRange, ProbeReport, OLD_RANGE_LIMIT};

/// Probes a random window near the start of the log
pub struct OldRangeProber {
    executor: ProbeExecutor,
}

impl OldRangeProber {
    pub fn new(executor: ProbeExecutor) -> Self {
        Self { executor }
    }

    /// `first` uniform in [0, OLD_RANGE_LIMIT), window of fixed width above it
    ///
    /// No check against the log's real size; a window past the end is a
    /// legitimate failing probe.
    pub fn pick_range<R: Rng + ?Sized>(rng: &mut R) -> ProbeRange {
        ProbeRange::starting_at(rng.gen_range(0..OLD_RANGE_LIMIT))
    }
}

#[async_trait]
impl Prober for OldRangeProber {
    fn category(&self) -> ProbeCategory {
        ProbeCategory::Old
    }

    async fn probe(&self) -> ProbeReport {
        let range = Self::pick_range(&mut rand::thread_rng());
        ProbeReport::Completed(self.executor.execute(ProbeCategory::Old, range).await)
    }
}
