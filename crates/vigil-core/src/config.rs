//! Engine configuration
//!
//! All configuration is supplied at construction and immutable afterwards.
//! Re-creating the engine is the supported way to change thresholds.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Default sliding-window capacity
pub const DEFAULT_WINDOW_CAPACITY: usize = 100;
/// Default severity cutoff for `threshold_exceeded`
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.7;

/// Threshold configuration for health and risk classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Variance above this value counts as a risk exceedance
    pub variance_threshold: f64,

    /// Absolute autocorrelation above this value counts as a risk exceedance
    pub autocorr_threshold: f64,

    /// Mean response time above this value (ms) counts as a risk exceedance
    pub response_time_threshold_ms: f64,

    /// Severity cutoff for marking a warning as threshold-exceeded
    pub warning_threshold: f64,

    /// Sliding-window capacity in records
    pub window_capacity: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            variance_threshold: 500.0,
            autocorr_threshold: 0.5,
            response_time_threshold_ms: 3000.0,
            warning_threshold: DEFAULT_WARNING_THRESHOLD,
            window_capacity: DEFAULT_WINDOW_CAPACITY,
        }
    }
}

impl ThresholdConfig {
    /// Validate construction-time invariants, failing fast on misconfiguration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_capacity == 0 {
            return Err(ConfigError::ZeroWindowCapacity);
        }
        if !(0.0..=1.0).contains(&self.warning_threshold) {
            return Err(ConfigError::InvalidWarningThreshold(self.warning_threshold));
        }
        Ok(())
    }
}

/// Full monitor configuration: thresholds plus cycle periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Threshold configuration
    pub thresholds: ThresholdConfig,

    /// Analysis cycle period in seconds
    pub analysis_period_secs: u64,

    /// Status-reporting cycle period in seconds
    pub status_period_secs: u64,

    /// Upper bound on a single warning-callback invocation, in seconds
    pub callback_timeout_secs: u64,

    /// How many metrics snapshots to retain for diagnostics
    pub metrics_history_capacity: usize,

    /// Trailing window for counting recent warnings in status reports, seconds
    pub warning_retention_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            analysis_period_secs: 30,
            status_period_secs: 300,
            callback_timeout_secs: 10,
            metrics_history_capacity: 256,
            warning_retention_secs: 600,
        }
    }
}

impl MonitorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sliding-window capacity
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.thresholds.window_capacity = capacity;
        self
    }

    /// Set the warning severity cutoff
    pub fn with_warning_threshold(mut self, threshold: f64) -> Self {
        self.thresholds.warning_threshold = threshold;
        self
    }

    /// Set the analysis cycle period
    pub fn with_analysis_period(mut self, secs: u64) -> Self {
        self.analysis_period_secs = secs;
        self
    }

    /// Analysis cycle period as a [`Duration`]
    pub fn analysis_period(&self) -> Duration {
        Duration::from_secs(self.analysis_period_secs)
    }

    /// Status cycle period as a [`Duration`]
    pub fn status_period(&self) -> Duration {
        Duration::from_secs(self.status_period_secs)
    }

    /// Callback timeout as a [`Duration`]
    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }

    /// Warning retention window as a chrono duration
    pub fn warning_retention(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.warning_retention_secs as i64)
    }

    /// Validate construction-time invariants, failing fast on misconfiguration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.analysis_period_secs == 0 {
            return Err(ConfigError::InvalidPeriod("analysis_period_secs"));
        }
        if self.status_period_secs == 0 {
            return Err(ConfigError::InvalidPeriod("status_period_secs"));
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(MonitorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_fails_fast() {
        let config = MonitorConfig::default().with_window_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroWindowCapacity)
        ));
    }

    #[test]
    fn test_out_of_range_warning_threshold_fails_fast() {
        let config = MonitorConfig::default().with_warning_threshold(1.5);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWarningThreshold(_))
        ));
    }

    #[test]
    fn test_zero_period_fails_fast() {
        let config = MonitorConfig::default().with_analysis_period(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPeriod("analysis_period_secs"))
        ));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = MonitorConfig::default();
        let text = toml::to_string(&config).unwrap();
        let parsed: MonitorConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
