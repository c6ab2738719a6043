// src/probe/mod.rs
//! Probe strategies and the shared timed request executor

use crate::ct_log::CtLogClient;
use crate::types::{ProbeCategory, ProbeReport};
use async_trait::async_trait;
use std::sync::Arc;

pub mod executor;
pub mod new_range;
pub mod old_range;

pub use executor::ProbeExecutor;
pub use new_range::NewRangeProber;
pub use old_range::OldRangeProber;

/// One self-contained probe cycle
///
/// Implementations never fail outward: every problem ends up in the
/// returned report.
#[async_trait]
pub trait Prober: Send + Sync {
    fn category(&self) -> ProbeCategory;

    async fn probe(&self) -> ProbeReport;
}

/// The old-range and new-range probers sharing one client
pub fn standard_probers(client: Arc<CtLogClient>) -> Vec<Arc<dyn Prober>> {
    let executor = ProbeExecutor::new(client);
    vec![
        Arc::new(OldRangeProber::new(executor.clone())),
        Arc::new(NewRangeProber::new(executor)),
    ]
}
