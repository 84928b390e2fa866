//! Engagement-cascade detection
//!
//! A record accumulating engagement far faster than organic spread allows is
//! a cascade: likes, reshares and replies arriving at bot speed. The detector
//! needs the caller's notion of "now" to turn raw engagement into a rate.

use chrono::Utc;
use std::collections::BTreeSet;

use crate::types::{CoordinationSignal, InteractionRecord, SignalType};

/// Total engagement a record must exceed before rate analysis applies
pub const ENGAGEMENT_FLOOR: u64 = 50;

/// Engagement-per-minute rate above which a cascade signal fires
pub const RATE_THRESHOLD: f64 = 10.0;

/// Guard against division by zero for records timestamped "now"
const MIN_ELAPSED_MINUTES: f64 = 1e-6;

/// Detect engagement cascades in the batch
///
/// `now_ms` must be in the same unit as record timestamps.
pub fn detect_cascades(batch: &[InteractionRecord], now_ms: u64) -> Vec<CoordinationSignal> {
    let mut signals = Vec::new();
    for record in batch {
        let engagement = record.engagement.total();
        if engagement <= ENGAGEMENT_FLOOR {
            continue;
        }
        let elapsed_ms = now_ms.saturating_sub(record.timestamp) as f64;
        let elapsed_minutes = (elapsed_ms / 60_000.0).max(MIN_ELAPSED_MINUTES);
        let rate = engagement as f64 / elapsed_minutes;
        if rate <= RATE_THRESHOLD {
            continue;
        }
        let mut participants = BTreeSet::new();
        participants.insert(record.agent_id.clone());
        signals.push(CoordinationSignal {
            signal_type: SignalType::Cascade,
            strength: (rate / 50.0).min(1.0),
            participants,
            evidence: vec![record.id],
            detected_at: Utc::now(),
        });
    }
    signals
}
