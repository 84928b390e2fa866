//! Error types for Vigil Core
//!
//! This module defines all error types used throughout the Vigil core engine.
//! We use `thiserror` for ergonomic error definitions with automatic Display/Error implementations.
//!
//! The engine's design goal is that a noisy or partially broken upstream never
//! stops the monitoring loop: malformed records are skipped per record,
//! collector failures are skipped per cycle, and degenerate numeric conditions
//! resolve to neutral values instead of errors. Only construction-time
//! misconfiguration fails fast, since that indicates a programming error
//! rather than a runtime data condition.

use thiserror::Error;

/// Result type alias for Vigil operations
pub type Result<T> = std::result::Result<T, VigilError>;

/// Main error type for Vigil operations
#[derive(Error, Debug)]
pub enum VigilError {
    /// Configuration errors (fail-fast at construction)
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed interaction record errors
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// External collector errors
    #[error("Collector error: {0}")]
    Collector(#[from] CollectorError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while validating or loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Window capacity must be at least 1")]
    ZeroWindowCapacity,

    #[error("Warning threshold must be in range [0.0, 1.0], got {0}")]
    InvalidWarningThreshold(f64),

    #[error("{0} must be greater than zero")]
    InvalidPeriod(&'static str),

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors raised while validating a raw interaction at the ingestion boundary
///
/// These are per-record conditions: the batch processor skips the offending
/// record with a diagnostic and continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing agent_id")]
    MissingAgentId,

    #[error("Missing timestamp")]
    MissingTimestamp,

    #[error("Unknown interaction kind: {0}")]
    UnknownKind(String),
}

/// Errors raised by an external collector
///
/// These are per-cycle conditions: the orchestrator logs the failure, treats
/// the cycle as "no data", and proceeds to the next cycle.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Failed to decode collector response: {0}")]
    Decode(String),

    #[error("Collector unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_error_display() {
        let err = RecordError::UnknownKind("boost".to_string());
        assert!(err.to_string().contains("boost"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: VigilError = ConfigError::ZeroWindowCapacity.into();
        assert!(err.to_string().contains("capacity"));
    }
}
