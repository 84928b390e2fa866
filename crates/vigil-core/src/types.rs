//! Core types for Vigil
//!
//! This module defines the fundamental data types flowing through the engine:
//! - Interaction records (the normalized input unit) and their raw wire shape
//! - Coordination metrics snapshots
//! - Coordination-pattern signals
//! - Early-warning signals
//! - Risk levels and system status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::error::RecordError;

/// Kind of agent interaction observed on the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Post,
    Like,
    Reshare,
    Reply,
}

impl InteractionKind {
    /// Parse a kind from its wire representation
    pub fn parse(s: &str) -> Result<Self, RecordError> {
        match s.to_ascii_lowercase().as_str() {
            "post" | "cast" => Ok(Self::Post),
            "like" => Ok(Self::Like),
            "reshare" | "recast" => Ok(Self::Reshare),
            "reply" => Ok(Self::Reply),
            other => Err(RecordError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => write!(f, "post"),
            Self::Like => write!(f, "like"),
            Self::Reshare => write!(f, "reshare"),
            Self::Reply => write!(f, "reply"),
        }
    }
}

/// Engagement counters attached to an interaction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub likes: u64,
    pub reshares: u64,
    pub replies: u64,
}

impl Engagement {
    pub fn new(likes: u64, reshares: u64, replies: u64) -> Self {
        Self {
            likes,
            reshares,
            replies,
        }
    }

    /// Total engagement across all counters
    pub fn total(&self) -> u64 {
        self.likes + self.reshares + self.replies
    }
}

/// A single normalized agent interaction
///
/// Immutable input unit of the engine. Produced by an external collector,
/// consumed read-only by the core, never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    /// Stable identifier assigned at ingestion, used as signal evidence
    pub id: Uuid,
    /// Identifier of the acting agent
    pub agent_id: String,
    /// What kind of interaction this was
    pub kind: InteractionKind,
    /// Monotonic timestamp in milliseconds
    pub timestamp: u64,
    /// Agent this interaction targeted, if any
    pub target_agent: Option<String>,
    /// Latency since the prompting event, in milliseconds
    pub response_time_ms: f64,
    /// Textual content, may be empty
    pub content: String,
    /// Engagement counters
    pub engagement: Engagement,
    /// Channel the interaction occurred in, if any
    pub channel: Option<String>,
}

/// Loosely-typed wire shape of an interaction, as collectors deliver it
///
/// Everything is optional; [`RawInteraction::validate`] applies the defined
/// default-filling rules and rejects records missing required fields. This
/// replaces silent dictionary fallbacks with explicit boundary validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInteraction {
    pub agent_id: Option<String>,
    pub interaction_type: Option<String>,
    pub timestamp: Option<u64>,
    pub target_agent: Option<String>,
    pub response_time: Option<f64>,
    pub content: Option<String>,
    pub likes: Option<u64>,
    pub reshares: Option<u64>,
    pub replies: Option<u64>,
    pub channel: Option<String>,
}

impl RawInteraction {
    /// Validate this raw interaction into a normalized record
    ///
    /// Required: a non-empty `agent_id` and a `timestamp`. Everything else
    /// defaults: missing kind is treated as a post, missing response time as
    /// zero latency, missing engagement as zero counters.
    pub fn validate(self) -> Result<InteractionRecord, RecordError> {
        let agent_id = match self.agent_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(RecordError::MissingAgentId),
        };
        let timestamp = self.timestamp.ok_or(RecordError::MissingTimestamp)?;
        let kind = match self.interaction_type.as_deref() {
            Some(s) => InteractionKind::parse(s)?,
            None => InteractionKind::Post,
        };

        Ok(InteractionRecord {
            id: Uuid::new_v4(),
            agent_id,
            kind,
            timestamp,
            target_agent: self.target_agent,
            response_time_ms: self.response_time.unwrap_or(0.0),
            content: self.content.unwrap_or_default(),
            engagement: Engagement::new(
                self.likes.unwrap_or(0),
                self.reshares.unwrap_or(0),
                self.replies.unwrap_or(0),
            ),
            channel: self.channel,
        })
    }
}

/// Point-in-time coordination-health metrics
///
/// Created once per analysis cycle and appended to a bounded metrics history.
/// The early-warning detector compares consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationMetrics {
    /// When this snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Population variance of response latencies over the window (>= 0)
    pub variance: f64,
    /// Lag-1 autocorrelation of response latencies, in [-1, 1]
    pub autocorrelation: f64,
    /// Mean response time over the window, in milliseconds (>= 0)
    pub response_time: f64,
    /// Number of interactions in the evaluated batch
    pub interaction_count: usize,
    /// Distinct agents in the evaluated batch
    pub agent_count: usize,
    /// Normalized health score in [0, 1]; 1.0 is fully healthy
    pub coordination_health: f64,
}

impl CoordinationMetrics {
    /// Neutral snapshot used when there is not enough data to evaluate
    ///
    /// Absence of evidence is not evidence of pathology, so health defaults
    /// to 1.0 and every indicator to its neutral value.
    pub fn neutral(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            variance: 0.0,
            autocorrelation: 0.0,
            response_time: 0.0,
            interaction_count: 0,
            agent_count: 0,
            coordination_health: 1.0,
        }
    }
}

/// Type of detected coordination pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Synchrony,
    Echo,
    Cascade,
    Swarm,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Synchrony => write!(f, "synchrony"),
            Self::Echo => write!(f, "echo"),
            Self::Cascade => write!(f, "cascade"),
            Self::Swarm => write!(f, "swarm"),
        }
    }
}

/// A detected coordination pattern
///
/// Ephemeral: produced per analysis cycle, not persisted beyond reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationSignal {
    /// Pattern type
    pub signal_type: SignalType,
    /// Pattern strength in [0, 1]
    pub strength: f64,
    /// Distinct agents participating in the pattern
    pub participants: BTreeSet<String>,
    /// Record ids backing the signal
    pub evidence: Vec<Uuid>,
    /// When the pattern was detected
    pub detected_at: DateTime<Utc>,
}

/// Type of early-warning indicator that fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningType {
    VarianceSpike,
    AutocorrIncrease,
    ResponseLag,
}

impl fmt::Display for WarningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarianceSpike => write!(f, "variance_spike"),
            Self::AutocorrIncrease => write!(f, "autocorr_increase"),
            Self::ResponseLag => write!(f, "response_lag"),
        }
    }
}

/// Early warning that the system's statistical indicators are degrading
///
/// At most one is emitted per cycle: the most severe candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarlyWarningSignal {
    /// Which indicator fired
    pub signal_type: WarningType,
    /// Severity in [0, 1]
    pub severity: f64,
    /// The metrics snapshot that triggered the warning
    pub metrics: CoordinationMetrics,
    /// Whether severity exceeded the configured warning threshold
    pub threshold_exceeded: bool,
    /// When the warning was raised
    pub detected_at: DateTime<Utc>,
}

/// Discrete coordination risk level derived from threshold exceedances
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Overall system status derived from the latest health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    Healthy,
    Monitoring,
    Warning,
    Critical,
    NoData,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Healthy => write!(f, "healthy"),
            Self::Monitoring => write!(f, "monitoring"),
            Self::Warning => write!(f, "warning"),
            Self::Critical => write!(f, "critical"),
            Self::NoData => write!(f, "no_data"),
        }
    }
}

/// Aggregate status report exposed by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub status: SystemStatus,
    pub health: f64,
    pub variance: f64,
    pub autocorrelation: f64,
    pub response_time: f64,
    pub recent_warning_count: usize,
    pub agent_count: usize,
    pub interaction_count: usize,
}

impl StatusReport {
    /// Report for an engine that has not yet seen any data
    pub fn no_data() -> Self {
        Self {
            status: SystemStatus::NoData,
            health: 1.0,
            variance: 0.0,
            autocorrelation: 0.0,
            response_time: 0.0,
            recent_warning_count: 0,
            agent_count: 0,
            interaction_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(agent: &str, ts: u64) -> RawInteraction {
        RawInteraction {
            agent_id: Some(agent.to_string()),
            timestamp: Some(ts),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_applies_defaults() {
        let record = raw("agent1", 1000).validate().unwrap();
        assert_eq!(record.agent_id, "agent1");
        assert_eq!(record.kind, InteractionKind::Post);
        assert_eq!(record.response_time_ms, 0.0);
        assert_eq!(record.engagement.total(), 0);
        assert!(record.content.is_empty());
        assert!(record.target_agent.is_none());
        assert!(record.channel.is_none());
    }

    #[test]
    fn test_validate_rejects_missing_agent() {
        let mut r = raw("agent1", 1000);
        r.agent_id = None;
        assert_eq!(r.validate().unwrap_err(), RecordError::MissingAgentId);

        let mut r = raw("", 1000);
        r.agent_id = Some(String::new());
        assert_eq!(r.validate().unwrap_err(), RecordError::MissingAgentId);
    }

    #[test]
    fn test_validate_rejects_missing_timestamp() {
        let mut r = raw("agent1", 1000);
        r.timestamp = None;
        assert_eq!(r.validate().unwrap_err(), RecordError::MissingTimestamp);
    }

    #[test]
    fn test_validate_rejects_unknown_kind() {
        let mut r = raw("agent1", 1000);
        r.interaction_type = Some("boost".to_string());
        assert!(matches!(
            r.validate().unwrap_err(),
            RecordError::UnknownKind(_)
        ));
    }

    #[test]
    fn test_kind_parse_accepts_wire_aliases() {
        // The source network calls posts "casts" and reshares "recasts".
        assert_eq!(InteractionKind::parse("cast").unwrap(), InteractionKind::Post);
        assert_eq!(
            InteractionKind::parse("recast").unwrap(),
            InteractionKind::Reshare
        );
        assert_eq!(InteractionKind::parse("REPLY").unwrap(), InteractionKind::Reply);
    }

    #[test]
    fn test_neutral_metrics_are_optimistic() {
        let m = CoordinationMetrics::neutral(Utc::now());
        assert_eq!(m.coordination_health, 1.0);
        assert_eq!(m.variance, 0.0);
        assert_eq!(m.autocorrelation, 0.0);
    }

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
        assert!(RiskLevel::High < RiskLevel::Critical);
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&SystemStatus::NoData).unwrap();
        assert_eq!(json, "\"no_data\"");
        let json = serde_json::to_string(&WarningType::VarianceSpike).unwrap();
        assert_eq!(json, "\"variance_spike\"");
    }
}
