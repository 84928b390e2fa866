//! Early-warning detection
//!
//! Stateful trend comparator: compares the current metrics snapshot against
//! the immediately preceding one and against absolute thresholds, and emits
//! at most one warning per cycle, the most severe candidate. Trend-based
//! rather than purely absolute: a variance spike is only a spike relative to
//! the previous cycle, and only once it clears an absolute floor.

use chrono::Utc;

use crate::types::{CoordinationMetrics, EarlyWarningSignal, WarningType};

/// Absolute variance floor below which a relative spike is ignored
pub const VARIANCE_SPIKE_FLOOR: f64 = 500.0;

/// Variance must exceed this multiple of the previous snapshot to spike
pub const VARIANCE_SPIKE_RATIO: f64 = 2.0;

/// Absolute autocorrelation above this value is a warning candidate
pub const AUTOCORR_WARNING_LEVEL: f64 = 0.5;

/// Mean response time (ms) above this value is a warning candidate
pub const RESPONSE_LAG_LEVEL_MS: f64 = 3000.0;

/// Severity denominators: variance and response time are scaled against the
/// same ceilings the health score uses
const VARIANCE_SEVERITY_SCALE: f64 = 1000.0;
const RESPONSE_SEVERITY_SCALE: f64 = 5000.0;

/// Stateful early-warning detector
#[derive(Debug, Default)]
pub struct EarlyWarningDetector {
    previous: Option<CoordinationMetrics>,
    warning_threshold: f64,
}

impl EarlyWarningDetector {
    /// Create a detector with the given severity cutoff for
    /// `threshold_exceeded`
    pub fn new(warning_threshold: f64) -> Self {
        Self {
            previous: None,
            warning_threshold,
        }
    }

    /// Evaluate one metrics snapshot against the previous one
    ///
    /// Returns the single most severe warning candidate, or `None` when no
    /// indicator fired. No candidates is not an error. The snapshot becomes
    /// the comparison baseline for the next call either way.
    pub fn evaluate(&mut self, metrics: &CoordinationMetrics) -> Option<EarlyWarningSignal> {
        let mut candidates: Vec<(WarningType, f64)> = Vec::new();

        // Variance spike: relative jump and absolute floor must both hold.
        if let Some(prev) = &self.previous {
            if metrics.variance > prev.variance * VARIANCE_SPIKE_RATIO
                && metrics.variance > VARIANCE_SPIKE_FLOOR
            {
                candidates.push((
                    WarningType::VarianceSpike,
                    (metrics.variance / VARIANCE_SEVERITY_SCALE).min(1.0),
                ));
            }
        }

        // Rising autocorrelation: slower recovery from perturbations.
        if metrics.autocorrelation.abs() > AUTOCORR_WARNING_LEVEL {
            candidates.push((
                WarningType::AutocorrIncrease,
                metrics.autocorrelation.abs().min(1.0),
            ));
        }

        // Response-time degradation.
        if metrics.response_time > RESPONSE_LAG_LEVEL_MS {
            candidates.push((
                WarningType::ResponseLag,
                (metrics.response_time / RESPONSE_SEVERITY_SCALE).min(1.0),
            ));
        }

        self.previous = Some(metrics.clone());

        let (signal_type, severity) = candidates
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        Some(EarlyWarningSignal {
            signal_type,
            severity,
            metrics: metrics.clone(),
            threshold_exceeded: severity > self.warning_threshold,
            detected_at: Utc::now(),
        })
    }

    /// The snapshot from the previous cycle, if any
    pub fn previous(&self) -> Option<&CoordinationMetrics> {
        self.previous.as_ref()
    }
}
