//! Agent-swarm detection
//!
//! Classifies records as "agent-like" via a disjunctive heuristic (identifier
//! markers, long-form or heavily structured content), then checks whether the
//! agent-like cohort acted in timestamp lockstep. A low timestamp variance
//! across three or more agent-like records suggests scripted coordination
//! rather than organic activity.

use chrono::Utc;
use std::collections::BTreeSet;

use crate::stats::population_variance;
use crate::types::{CoordinationSignal, InteractionRecord, SignalType};

/// Minimum number of agent-like records before swarm analysis applies
pub const SWARM_MIN_SIZE: usize = 3;

/// Timestamp-variance ceiling (time-unit squared) below which the cohort is
/// considered suspiciously synchronized
pub const TIMESTAMP_VARIANCE_CEILING: f64 = 3600.0;

/// Content longer than this is treated as long-form (an agent indicator)
const LONG_FORM_CHARS: usize = 280;

/// More newlines than this marks content as structured (an agent indicator)
const STRUCTURED_NEWLINES: usize = 3;

/// Indicators needed before a record counts as agent-like
const MIN_INDICATORS: usize = 2;

fn is_agent_like(record: &InteractionRecord) -> bool {
    let id = record.agent_id.to_lowercase();
    let indicators = [
        id.contains("agent"),
        id.contains("bot"),
        id.contains("ai"),
        record.content.matches('\n').count() > STRUCTURED_NEWLINES,
        record.content.chars().count() > LONG_FORM_CHARS,
    ];
    indicators.iter().filter(|i| **i).count() >= MIN_INDICATORS
}

/// Detect swarm coordination among agent-like records
pub fn detect_swarms(batch: &[InteractionRecord]) -> Vec<CoordinationSignal> {
    let cohort: Vec<&InteractionRecord> = batch.iter().filter(|r| is_agent_like(r)).collect();
    if cohort.len() < SWARM_MIN_SIZE {
        return Vec::new();
    }

    let timestamps: Vec<f64> = cohort.iter().map(|r| r.timestamp as f64).collect();
    let variance = population_variance(&timestamps);
    if variance >= TIMESTAMP_VARIANCE_CEILING {
        return Vec::new();
    }

    let participants: BTreeSet<String> = cohort.iter().map(|r| r.agent_id.clone()).collect();
    let strength = (1.0 - variance / TIMESTAMP_VARIANCE_CEILING).clamp(0.0, 1.0);
    vec![CoordinationSignal {
        signal_type: SignalType::Swarm,
        strength,
        participants,
        evidence: cohort.iter().map(|r| r.id).collect(),
        detected_at: Utc::now(),
    }]
}
