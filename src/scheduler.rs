// src/scheduler.rs
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::output::OutputManager;
use crate::probe::Prober;
use crate::stats::StatsCollector;

/// Default spacing between rounds
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Fires one round of probes per interval without waiting on any of them
pub struct Scheduler {
    probers: Vec<Arc<dyn Prober>>,
    interval: Duration,
    output: Arc<OutputManager>,
    stats: StatsCollector,
    limiter: Option<Arc<Semaphore>>,
}

impl Scheduler {
    pub fn new(
        probers: Vec<Arc<dyn Prober>>,
        interval: Duration,
        output: Arc<OutputManager>,
        stats: StatsCollector,
    ) -> Self {
        Self {
            probers,
            interval,
            output,
            stats,
            limiter: None,
        }
    }

    /// Cap the number of probe tasks alive at once; extra launches are skipped
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(max_in_flight)));
        self
    }

    /// Launch rounds until `shutdown_rx` turns true or its sender goes away
    ///
    /// Probes still running at shutdown are neither awaited nor cancelled.
    pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
        info!(
            "Scheduler running: {} probes every {:?}",
            self.probers.len(),
            self.interval
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.launch_round(),
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            "Scheduler stopped ({} probes still in flight)",
            self.stats.in_flight()
        );
    }

    fn launch_round(&self) {
        debug!("Launching probe round");
        for prober in &self.probers {
            self.launch(Arc::clone(prober));
        }
    }

    fn launch(&self, prober: Arc<dyn Prober>) {
        let permit = match &self.limiter {
            Some(limiter) => match Arc::clone(limiter).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!(
                        "Skipping {} probe: {} probes already in flight",
                        prober.category(),
                        self.stats.in_flight()
                    );
                    self.stats.probe_skipped();
                    return;
                }
            },
            None => None,
        };

        let output = Arc::clone(&self.output);
        let in_flight = self.stats.probe_started();

        tokio::spawn(async move {
            let report = prober.probe().await;
            drop(permit);
            in_flight.finish(&report);

            if let Err(e) = output.emit(&report).await {
                warn!("Output error: {:?}", e);
            }
        });
    }
}
