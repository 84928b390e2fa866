//! Vigil command-line runner
//!
//! Wires a collector to the coordination monitor and runs the monitoring
//! loop until interrupted. By default a simulated source supplies activity;
//! point `--endpoint` at a live JSON feed to monitor a real network.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use vigil_collector::{HttpCollector, SimulatedCollector};
use vigil_core::monitor::CoordinationMonitor;
use vigil_core::types::EarlyWarningSignal;
use vigil_core::{Collector, MonitorConfig, TracingSink};

#[derive(Parser)]
#[command(name = "vigil", version, about = "Early-warning monitor for agent coordination failures")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the monitoring loop until ctrl-c
    Run {
        /// Poll a live JSON endpoint instead of the simulated source
        #[arg(long)]
        endpoint: Option<String>,

        /// Analysis cycle period in seconds
        #[arg(long)]
        analysis_period: Option<u64>,
    },
    /// Pull one batch, analyze it, and print the outcome as JSON
    Test {
        /// Poll a live JSON endpoint instead of the simulated source
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path}"))?,
        None => MonitorConfig::default(),
    };
    if let Command::Run {
        analysis_period: Some(secs),
        ..
    } = &cli.command
    {
        config = config.with_analysis_period(*secs);
    }
    Ok(config)
}

fn build_collector(endpoint: &Option<String>) -> anyhow::Result<Box<dyn Collector>> {
    match endpoint {
        Some(url) => {
            let collector = HttpCollector::new(url.clone())
                .with_context(|| format!("Failed to build HTTP collector for {url}"))?;
            tracing::info!(endpoint = %url, "Using live HTTP source");
            Ok(Box::new(collector))
        }
        None => {
            tracing::info!("Using simulated source");
            Ok(Box::new(SimulatedCollector::new()))
        }
    }
}

/// Example warning handler: formats an alert the way a dashboard or social
/// bot would post it
fn format_alert(warning: &EarlyWarningSignal) -> String {
    let marker = if warning.severity < 0.8 { "WARN" } else { "CRIT" };
    format!(
        "[{marker}] Coordination warning: {} (severity {:.2}, health {:.0}%)",
        warning.signal_type,
        warning.severity,
        warning.metrics.coordination_health * 100.0
    )
}

async fn run(monitor: Arc<CoordinationMonitor>, collector: Box<dyn Collector>) -> anyhow::Result<()> {
    monitor
        .add_warning_callback(Arc::new(|warning| {
            Box::pin(async move {
                tracing::warn!("{}", format_alert(&warning));
                Ok(())
            })
        }))
        .await;

    let runner = {
        let monitor = monitor.clone();
        tokio::spawn(async move { monitor.run(collector).await })
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    tracing::info!("Interrupt received, stopping monitor");
    monitor.stop();

    runner.await.context("Monitor task panicked")??;

    let status = monitor.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

async fn test_once(
    monitor: Arc<CoordinationMonitor>,
    mut collector: Box<dyn Collector>,
) -> anyhow::Result<()> {
    let batch = collector.pull_batch().await.context("Collector failed")?;
    tracing::info!(count = batch.len(), "Collected test batch");

    match monitor.ingest_batch(batch).await {
        Some(outcome) => {
            tracing::info!(
                health = outcome.metrics.coordination_health,
                risk = %outcome.risk,
                "Analysis complete"
            );
            if let Some(warning) = &outcome.warning {
                tracing::warn!("{}", format_alert(warning));
            }
            println!("{}", serde_json::to_string_pretty(&outcome.metrics)?);
        }
        None => tracing::info!("No valid records in test batch"),
    }

    let status = monitor.status().await;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let monitor = Arc::new(CoordinationMonitor::with_sink(
        config,
        Arc::new(TracingSink),
    )?);

    match &cli.command {
        Command::Run { endpoint, .. } => {
            let collector = build_collector(endpoint)?;
            run(monitor, collector).await
        }
        Command::Test { endpoint } => {
            let collector = build_collector(endpoint)?;
            test_once(monitor, collector).await
        }
    }
}
