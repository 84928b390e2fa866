//! Observability seam
//!
//! The engine exposes a narrow event-sink interface that an external
//! telemetry exporter can subscribe to. The core never depends on a specific
//! exporter; by default events go nowhere.

use crate::types::{CoordinationMetrics, CoordinationSignal, EarlyWarningSignal};

/// Receiver for engine events
///
/// All methods default to no-ops so implementors only override what they
/// care about. Implementations must be cheap or hand off to their own
/// execution context; sinks are invoked inline on the analysis path.
pub trait MonitorSink: Send + Sync {
    /// A metrics snapshot was produced
    fn on_metrics(&self, _metrics: &CoordinationMetrics) {}

    /// A coordination signal was detected
    fn on_signal(&self, _signal: &CoordinationSignal) {}

    /// An early warning was raised
    fn on_warning(&self, _warning: &EarlyWarningSignal) {}
}

/// Sink that discards all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl MonitorSink for NullSink {}

/// Sink that forwards events to the `tracing` subscriber
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MonitorSink for TracingSink {
    fn on_metrics(&self, metrics: &CoordinationMetrics) {
        tracing::info!(
            health = metrics.coordination_health,
            variance = metrics.variance,
            autocorrelation = metrics.autocorrelation,
            response_time = metrics.response_time,
            agents = metrics.agent_count,
            "metrics snapshot"
        );
    }

    fn on_signal(&self, signal: &CoordinationSignal) {
        tracing::warn!(
            signal_type = %signal.signal_type,
            strength = signal.strength,
            participants = signal.participants.len(),
            "coordination signal detected"
        );
    }

    fn on_warning(&self, warning: &EarlyWarningSignal) {
        tracing::warn!(
            signal_type = %warning.signal_type,
            severity = warning.severity,
            threshold_exceeded = warning.threshold_exceeded,
            "early warning raised"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink that counts events for assertions
    #[derive(Debug, Default)]
    struct CountingSink {
        metrics: AtomicUsize,
        signals: AtomicUsize,
        warnings: AtomicUsize,
    }

    impl MonitorSink for CountingSink {
        fn on_metrics(&self, _m: &CoordinationMetrics) {
            self.metrics.fetch_add(1, Ordering::SeqCst);
        }
        fn on_signal(&self, _s: &CoordinationSignal) {
            self.signals.fetch_add(1, Ordering::SeqCst);
        }
        fn on_warning(&self, _w: &EarlyWarningSignal) {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_null_sink_accepts_everything() {
        let sink = NullSink;
        sink.on_metrics(&CoordinationMetrics::neutral(Utc::now()));
    }

    #[test]
    fn test_counting_sink_counts() {
        let sink = CountingSink::default();
        sink.on_metrics(&CoordinationMetrics::neutral(Utc::now()));
        sink.on_metrics(&CoordinationMetrics::neutral(Utc::now()));
        assert_eq!(sink.metrics.load(Ordering::SeqCst), 2);
        assert_eq!(sink.signals.load(Ordering::SeqCst), 0);
        assert_eq!(sink.warnings.load(Ordering::SeqCst), 0);
    }
}
