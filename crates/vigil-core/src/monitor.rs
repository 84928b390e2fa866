//! Monitoring orchestrator
//!
//! Drives the poll/analyze/report cycle: pull a batch from the collector,
//! validate and admit it to the sliding window, compute statistics and run
//! the pattern detectors, classify health and risk, check for early
//! warnings, and dispatch registered callbacks.
//!
//! Two periodic activities share engine state: the analysis cycle (writer)
//! and the status-reporting cycle (reader). Both go through one
//! `tokio::sync::RwLock`, so a status read never observes a partially
//! updated window. The stop flag is polled once per cycle boundary; callback
//! dispatch is awaited inline, so shutdown naturally drains in-flight
//! dispatches.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};

use crate::collector::Collector;
use crate::config::MonitorConfig;
use crate::detect::detect_all;
use crate::error::Result;
use crate::health::{classify_risk, coordination_health};
use crate::sink::{MonitorSink, NullSink};
use crate::stats::{mean_response_time, response_autocorrelation, response_variance};
use crate::types::{
    CoordinationMetrics, CoordinationSignal, EarlyWarningSignal, InteractionRecord,
    RawInteraction, RiskLevel, StatusReport, SystemStatus,
};
use crate::warning::EarlyWarningDetector;
use crate::window::WindowStore;

/// Outcome of a warning callback
pub type CallbackResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Asynchronous warning callback
///
/// Callbacks run sequentially and isolated: a failing or slow callback is
/// logged and never aborts the cycle or the other callbacks. Each invocation
/// is bounded by the configured callback timeout.
pub type WarningCallback =
    Arc<dyn Fn(EarlyWarningSignal) -> BoxFuture<'static, CallbackResult> + Send + Sync>;

/// Everything one analysis cycle produced
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Metrics snapshot for this cycle
    pub metrics: CoordinationMetrics,
    /// Discrete risk level derived from threshold exceedances
    pub risk: RiskLevel,
    /// Coordination patterns detected in the batch
    pub signals: Vec<CoordinationSignal>,
    /// At most one early warning, the most severe candidate
    pub warning: Option<EarlyWarningSignal>,
}

/// Mutable engine state shared between the analysis and status cycles
#[derive(Debug)]
struct EngineState {
    window: WindowStore,
    metrics_history: VecDeque<CoordinationMetrics>,
    warnings: VecDeque<EarlyWarningSignal>,
    detector: EarlyWarningDetector,
}

/// The coordination monitor: engine state plus cycle driver
pub struct CoordinationMonitor {
    config: MonitorConfig,
    state: RwLock<EngineState>,
    callbacks: RwLock<Vec<WarningCallback>>,
    sink: Arc<dyn MonitorSink>,
    stop_tx: watch::Sender<bool>,
}

impl CoordinationMonitor {
    /// Create a monitor with the given configuration
    ///
    /// Fails fast on misconfiguration (zero window capacity, out-of-range
    /// thresholds, zero cycle periods).
    pub fn new(config: MonitorConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(NullSink))
    }

    /// Create a monitor with an event sink attached
    pub fn with_sink(config: MonitorConfig, sink: Arc<dyn MonitorSink>) -> Result<Self> {
        config.validate()?;
        let window = WindowStore::new(config.thresholds.window_capacity)?;
        let detector = EarlyWarningDetector::new(config.thresholds.warning_threshold);
        let (stop_tx, _) = watch::channel(false);

        Ok(Self {
            state: RwLock::new(EngineState {
                window,
                metrics_history: VecDeque::with_capacity(config.metrics_history_capacity),
                warnings: VecDeque::new(),
                detector,
            }),
            config,
            callbacks: RwLock::new(Vec::new()),
            sink,
            stop_tx,
        })
    }

    /// Register a callback invoked whenever an early warning is raised
    pub async fn add_warning_callback(&self, callback: WarningCallback) {
        self.callbacks.write().await.push(callback);
    }

    /// Validate a raw batch, skipping malformed records with a diagnostic
    fn validate_batch(raw: Vec<RawInteraction>) -> Vec<InteractionRecord> {
        let mut records = Vec::with_capacity(raw.len());
        for interaction in raw {
            match interaction.validate() {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping malformed interaction: {e}"),
            }
        }
        records
    }

    /// Analyze one raw batch against wall-clock time
    ///
    /// Returns `None` when the batch carries no valid records: that is "no
    /// data this cycle", not an error.
    pub async fn ingest_batch(&self, raw: Vec<RawInteraction>) -> Option<CycleOutcome> {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        self.ingest_batch_at(raw, now_ms).await
    }

    /// Analyze one raw batch against an explicit "now"
    ///
    /// `now_ms` must be in the same monotonic unit as record timestamps; the
    /// cascade detector uses it to turn engagement into a rate.
    pub async fn ingest_batch_at(
        &self,
        raw: Vec<RawInteraction>,
        now_ms: u64,
    ) -> Option<CycleOutcome> {
        let batch = Self::validate_batch(raw);
        if batch.is_empty() {
            tracing::debug!("No coordination data this cycle");
            return None;
        }

        let mut state = self.state.write().await;
        for record in &batch {
            state.window.admit(record.clone());
        }
        let window = state.window.snapshot();

        let variance = response_variance(&window);
        let autocorrelation = response_autocorrelation(&window);
        let response_time = mean_response_time(&window);
        let agent_count = batch
            .iter()
            .map(|r| r.agent_id.as_str())
            .collect::<std::collections::BTreeSet<_>>()
            .len();

        let metrics = CoordinationMetrics {
            timestamp: Utc::now(),
            variance,
            autocorrelation,
            response_time,
            interaction_count: batch.len(),
            agent_count,
            coordination_health: coordination_health(variance, autocorrelation, response_time),
        };

        if state.metrics_history.len() == self.config.metrics_history_capacity {
            state.metrics_history.pop_front();
        }
        state.metrics_history.push_back(metrics.clone());

        let risk = classify_risk(
            variance,
            autocorrelation,
            response_time,
            &self.config.thresholds,
        );

        // Detectors run against the immutable batch snapshot, not the live
        // window, and write nothing back.
        let signals = detect_all(&batch, now_ms);

        let warning = state.detector.evaluate(&metrics);
        if let Some(w) = &warning {
            if state.warnings.len() == self.config.metrics_history_capacity {
                state.warnings.pop_front();
            }
            state.warnings.push_back(w.clone());
        }
        drop(state);

        self.sink.on_metrics(&metrics);
        for signal in &signals {
            self.sink.on_signal(signal);
        }
        if let Some(w) = &warning {
            self.sink.on_warning(w);
        }

        Some(CycleOutcome {
            metrics,
            risk,
            signals,
            warning,
        })
    }

    /// Dispatch a warning to every registered callback
    ///
    /// Sequential and isolated per callback: failures and timeouts are
    /// logged, never propagated.
    pub async fn dispatch_warning(&self, warning: &EarlyWarningSignal) {
        tracing::warn!(
            signal_type = %warning.signal_type,
            severity = warning.severity,
            health = warning.metrics.coordination_health,
            variance = warning.metrics.variance,
            autocorrelation = warning.metrics.autocorrelation,
            response_time = warning.metrics.response_time,
            agents = warning.metrics.agent_count,
            "Coordination warning detected"
        );

        let callbacks = self.callbacks.read().await.clone();
        for callback in callbacks {
            let fut = callback(warning.clone());
            match tokio::time::timeout(self.config.callback_timeout(), fut).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!("Error in warning callback: {e}"),
                Err(_) => tracing::error!(
                    "Warning callback timed out after {:?}",
                    self.config.callback_timeout()
                ),
            }
        }
    }

    /// Current aggregate status
    ///
    /// Read-only: never mutates engine state, safe to call concurrently with
    /// the analysis cycle.
    pub async fn status(&self) -> StatusReport {
        let state = self.state.read().await;
        let latest = match state.metrics_history.back() {
            Some(m) => m,
            None => return StatusReport::no_data(),
        };

        let cutoff = Utc::now() - self.config.warning_retention();
        let recent_warning_count = state
            .warnings
            .iter()
            .filter(|w| w.detected_at > cutoff)
            .count();

        let status = if latest.coordination_health < 0.3 {
            SystemStatus::Critical
        } else if latest.coordination_health < 0.6 {
            SystemStatus::Warning
        } else if recent_warning_count > 0 {
            SystemStatus::Monitoring
        } else {
            SystemStatus::Healthy
        };

        StatusReport {
            status,
            health: latest.coordination_health,
            variance: latest.variance,
            autocorrelation: latest.autocorrelation,
            response_time: latest.response_time,
            recent_warning_count,
            agent_count: latest.agent_count,
            interaction_count: latest.interaction_count,
        }
    }

    /// Warnings raised since the given instant
    pub async fn recent_warnings(&self, since: DateTime<Utc>) -> Vec<EarlyWarningSignal> {
        self.state
            .read()
            .await
            .warnings
            .iter()
            .filter(|w| w.detected_at > since)
            .cloned()
            .collect()
    }

    /// Latest metrics snapshot, if any
    pub async fn latest_metrics(&self) -> Option<CoordinationMetrics> {
        self.state.read().await.metrics_history.back().cloned()
    }

    /// Signal the run loop to stop at the next cycle boundary
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Run the monitoring loop until stopped
    ///
    /// Schedules both periodic cycles as turns of a single event loop; the
    /// status cycle reads the same state the analysis cycle writes, through
    /// the shared lock. The stop flag is checked between cycles, never
    /// mid-cycle.
    pub async fn run<C: Collector>(&self, mut collector: C) -> Result<()> {
        tracing::info!(
            analysis_period_secs = self.config.analysis_period_secs,
            status_period_secs = self.config.status_period_secs,
            "Starting coordination monitor"
        );

        let mut stop_rx = self.stop_tx.subscribe();
        let mut analysis = tokio::time::interval(self.config.analysis_period());
        let mut status = tokio::time::interval(self.config.status_period());
        analysis.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        status.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first status tick fires immediately and would report no_data;
        // skip it.
        status.tick().await;

        loop {
            if *stop_rx.borrow() {
                break;
            }
            tokio::select! {
                _ = analysis.tick() => {
                    self.run_analysis_cycle(&mut collector).await;
                }
                _ = status.tick() => {
                    self.report_status().await;
                }
                _ = stop_rx.changed() => {}
            }
        }

        tracing::info!("Coordination monitor stopped");
        Ok(())
    }

    async fn run_analysis_cycle<C: Collector>(&self, collector: &mut C) {
        let raw = match collector.pull_batch().await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::error!("Collector failed this cycle: {e}");
                return;
            }
        };

        if let Some(outcome) = self.ingest_batch(raw).await {
            tracing::info!(
                health = outcome.metrics.coordination_health,
                variance = outcome.metrics.variance,
                autocorrelation = outcome.metrics.autocorrelation,
                risk = %outcome.risk,
                signals = outcome.signals.len(),
                "Analysis cycle complete"
            );
            if let Some(warning) = &outcome.warning {
                self.dispatch_warning(warning).await;
            }
        }
    }

    async fn report_status(&self) {
        let report = self.status().await;
        match report.status {
            SystemStatus::Healthy | SystemStatus::NoData => {
                tracing::info!(status = %report.status, health = report.health, "System status");
            }
            _ => {
                tracing::warn!(
                    status = %report.status,
                    health = report.health,
                    recent_warnings = report.recent_warning_count,
                    "System status"
                );
            }
        }
    }
}

impl std::fmt::Debug for CoordinationMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinationMonitor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
