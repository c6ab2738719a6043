// src/main.rs
use anyhow::Context;
use clap::Parser;
use ct_latency_probe::cli::{Cli, OutputFormat};
use ct_latency_probe::config::Config;
use ct_latency_probe::ct_log::{CtLogClient, LogTarget};
use ct_latency_probe::output::{csv, human, json, silent, OutputHandler, OutputManager};
use ct_latency_probe::probe::standard_probers;
use ct_latency_probe::scheduler::Scheduler;
use ct_latency_probe::stats::StatsCollector;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    cli.validate()?;

    // Config file is optional; defaults cover everything but the log URL
    let mut config = match cli.config {
        Some(ref path) => Config::from_file(Path::new(path))?,
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    // Initialize logging
    let log_level = cli.log_level(&config.logging.level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let raw_url = config
        .probe
        .log_url
        .as_deref()
        .context("No log URL given: pass --log-url or set probe.log_url in the config file")?;
    let target = LogTarget::parse(raw_url)?;

    tracing::info!("Starting ct-latency-probe against {}", target);

    let timeout = Duration::from_secs(config.probe.timeout_secs);
    let client = Arc::new(CtLogClient::new(target, timeout)?);

    // Create output manager
    let mut output_manager = OutputManager::new();
    let handler: Arc<dyn OutputHandler> = match (cli.output_format(), cli.output.as_deref()) {
        (OutputFormat::Silent, _) => {
            tracing::info!("Silent mode: no per-probe output");
            Arc::new(silent::SilentOutput)
        }
        (format, Some(path)) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path))?;
            tracing::info!("Writing {:?} output to: {}", format, path);
            match format {
                OutputFormat::Json => Arc::new(json::JsonOutput::to_file(file)),
                OutputFormat::Csv => Arc::new(csv::CsvOutput::to_file(file)),
                _ => Arc::new(human::HumanOutput::to_file(file)),
            }
        }
        (OutputFormat::Json, None) => Arc::new(json::JsonOutput::new()),
        (OutputFormat::Csv, None) => Arc::new(csv::CsvOutput::new()),
        (OutputFormat::Human, None) => Arc::new(human::HumanOutput::new()),
    };
    output_manager.add_handler(handler);
    let output_manager = Arc::new(output_manager);

    let stats = StatsCollector::new();

    if config.stats.enabled {
        let stats_clone = stats.clone();
        let interval = Duration::from_secs(config.stats.interval_secs);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tracing::info!("{}", stats_clone.format_stats());
            }
        });
    }

    let mut scheduler = Scheduler::new(
        standard_probers(client),
        Duration::from_secs(config.probe.interval_secs),
        Arc::clone(&output_manager),
        stats.clone(),
    );
    match config.probe.max_in_flight {
        Some(max) => {
            tracing::info!("Capping in-flight probes at {}", max);
            scheduler = scheduler.with_max_in_flight(max);
        }
        None => tracing::debug!("No cap on in-flight probes"),
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            // Dropping the sender would stop the scheduler; keep probing instead
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl-C, stopping probe rounds");
        shutdown_tx.send(true).ok();
    });

    scheduler.run(shutdown_rx).await;

    output_manager.flush().await?;

    if config.stats.enabled {
        let snapshot = stats.snapshot();
        println!("\n\nFinal Statistics:");
        println!("  Launched: {}", snapshot.launched);
        println!("  Succeeded: {}", snapshot.succeeded);
        println!("  Failed: {}", snapshot.failed);
        println!("  Aborted: {}", snapshot.aborted);
        println!("  Skipped: {}", snapshot.skipped);
        println!("  Still in flight: {}", snapshot.in_flight);
        println!("  Uptime: {}", StatsCollector::format_uptime(snapshot.uptime_secs));
    }

    Ok(())
}
