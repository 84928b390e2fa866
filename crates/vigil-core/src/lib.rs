//! Vigil Core - streaming early-warning engine for agent coordination failures
//!
//! Vigil ingests a stream of agent-interaction events from a social network
//! and continuously computes statistical indicators drawn from critical
//! slowing down (CSD) theory: systems approaching a critical transition show
//! rising variance and rising autocorrelation in their fluctuations. Vigil
//! uses those indicators to flag impending coordination failures (bot swarms,
//! echo chambers, engagement cascades) before they fully manifest.
//!
//! # Architecture
//!
//! The engine is a pipeline of small components:
//!
//! 1. **Window store** (`window`): bounded FIFO buffer of recent records
//! 2. **Statistics engine** (`stats`): variance, lag-1 autocorrelation and
//!    mean latency over the window
//! 3. **Signal detectors** (`detect`): synchrony, echo, cascade and swarm
//!    pattern analyzers over each batch
//! 4. **Health & risk classifier** (`health`): normalized health score and
//!    discrete risk level
//! 5. **Early-warning detector** (`warning`): trend comparison against the
//!    previous cycle
//! 6. **Orchestrator** (`monitor`): the poll/analyze/report loop
//!
//! Data is fetched by an external [`collector::Collector`]; the engine only
//! assumes the record shape, never the transport.
//!
//! # Quick Start
//!
//! ```
//! use vigil_core::config::MonitorConfig;
//! use vigil_core::monitor::CoordinationMonitor;
//! use vigil_core::types::RawInteraction;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> vigil_core::Result<()> {
//! let monitor = CoordinationMonitor::new(MonitorConfig::default())?;
//!
//! let batch = vec![
//!     RawInteraction {
//!         agent_id: Some("agent1".into()),
//!         timestamp: Some(1_000),
//!         response_time: Some(200.0),
//!         ..Default::default()
//!     },
//!     RawInteraction {
//!         agent_id: Some("agent2".into()),
//!         timestamp: Some(2_000),
//!         response_time: Some(300.0),
//!         ..Default::default()
//!     },
//! ];
//!
//! let outcome = monitor.ingest_batch(batch).await.expect("valid batch");
//! println!("Coordination health: {:.2}", outcome.metrics.coordination_health);
//! println!("Status: {}", monitor.status().await.status);
//! # Ok(())
//! # }
//! ```
//!
//! # Design Principles
//!
//! 1. **A broken upstream never stops the loop**: malformed records are
//!    skipped, collector failures become empty cycles, degenerate numeric
//!    conditions resolve to neutral values
//! 2. **Insufficient data is optimistic**: no evidence of pathology defaults
//!    health to 1.0 and status to `no_data`
//! 3. **Detectors are stateless per call**: they see immutable batch
//!    snapshots, never the live window
//! 4. **Configuration is immutable after construction**: re-create the
//!    engine to change thresholds

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod collector;
pub mod config;
pub mod detect;
pub mod error;
pub mod health;
pub mod monitor;
pub mod sink;
pub mod stats;
pub mod types;
pub mod warning;
pub mod window;

pub use collector::Collector;
pub use config::{MonitorConfig, ThresholdConfig};
pub use error::{CollectorError, ConfigError, RecordError, Result, VigilError};
pub use monitor::{CoordinationMonitor, CycleOutcome, WarningCallback};
pub use sink::{MonitorSink, NullSink, TracingSink};
pub use types::{
    CoordinationMetrics, CoordinationSignal, EarlyWarningSignal, Engagement, InteractionKind,
    InteractionRecord, RawInteraction, RiskLevel, SignalType, StatusReport, SystemStatus,
    WarningType,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
