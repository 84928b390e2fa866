//! Synchronized-posting detection
//!
//! Buckets records into fixed-width time windows keyed by truncated
//! timestamp. A bucket with enough records from enough distinct agents is a
//! synchrony signal: independent actors rarely land in the same narrow slot.

use chrono::Utc;
use std::collections::BTreeMap;

use crate::types::{CoordinationSignal, InteractionRecord, SignalType};

/// Default bucket width: 5 minutes in milliseconds
pub const SYNC_BUCKET_WIDTH_MS: u64 = 5 * 60 * 1000;

/// Minimum records in a bucket before it qualifies
pub const SYNC_BUCKET_MIN: usize = 3;

/// Minimum distinct agents in a qualifying bucket
const MIN_DISTINCT_AGENTS: usize = 2;

/// Detect synchronized posting with the default bucket width
pub fn detect_synchrony(batch: &[InteractionRecord]) -> Vec<CoordinationSignal> {
    detect_synchrony_with_bucket(batch, SYNC_BUCKET_WIDTH_MS)
}

/// Detect synchronized posting with an explicit bucket width
pub fn detect_synchrony_with_bucket(
    batch: &[InteractionRecord],
    bucket_width_ms: u64,
) -> Vec<CoordinationSignal> {
    if batch.is_empty() || bucket_width_ms == 0 {
        return Vec::new();
    }

    // BTreeMap keeps buckets in ascending time order; records stay in
    // arrival order within each bucket.
    let mut buckets: BTreeMap<u64, Vec<&InteractionRecord>> = BTreeMap::new();
    for record in batch {
        let key = record.timestamp - record.timestamp % bucket_width_ms;
        buckets.entry(key).or_default().push(record);
    }

    let mut signals = Vec::new();
    for (_, bucket) in buckets {
        if bucket.len() < SYNC_BUCKET_MIN {
            continue;
        }
        let participants: std::collections::BTreeSet<String> =
            bucket.iter().map(|r| r.agent_id.clone()).collect();
        if participants.len() < MIN_DISTINCT_AGENTS {
            continue;
        }
        let strength = (bucket.len() as f64 / 10.0).min(1.0);
        signals.push(CoordinationSignal {
            signal_type: SignalType::Synchrony,
            strength,
            participants,
            evidence: bucket.iter().map(|r| r.id).collect(),
            detected_at: Utc::now(),
        });
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::record;

    #[test]
    fn test_four_records_two_agents_one_signal() {
        // All four land in the first 5-minute bucket.
        let batch = vec![
            record("a", 1_000),
            record("b", 2_000),
            record("a", 3_000),
            record("b", 4_000),
        ];
        let signals = detect_synchrony(&batch);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].strength, 0.4);
        assert_eq!(signals[0].participants.len(), 2);
        assert_eq!(signals[0].evidence.len(), 4);
    }

    #[test]
    fn test_single_agent_bucket_is_ignored() {
        let batch = vec![record("a", 1_000), record("a", 2_000), record("a", 3_000)];
        assert!(detect_synchrony(&batch).is_empty());
    }

    #[test]
    fn test_records_in_different_buckets_do_not_qualify() {
        let batch = vec![
            record("a", 0),
            record("b", SYNC_BUCKET_WIDTH_MS),
            record("a", 2 * SYNC_BUCKET_WIDTH_MS),
        ];
        assert!(detect_synchrony(&batch).is_empty());
    }

    #[test]
    fn test_strength_caps_at_one() {
        let batch: Vec<_> = (0..20)
            .map(|i| record(if i % 2 == 0 { "a" } else { "b" }, 1_000 + i))
            .collect();
        let signals = detect_synchrony(&batch);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].strength, 1.0);
    }

    #[test]
    fn test_narrow_bucket_splits_the_batch() {
        // With a 1-second bucket the same records no longer co-occur.
        let batch = vec![
            record("a", 0),
            record("b", 1_500),
            record("a", 3_000),
            record("b", 4_500),
        ];
        assert_eq!(detect_synchrony(&batch).len(), 1);
        assert!(detect_synchrony_with_bucket(&batch, 1_000).is_empty());
    }

    #[test]
    fn test_evidence_preserves_arrival_order() {
        let batch = vec![record("a", 3_000), record("b", 1_000), record("c", 2_000)];
        let signals = detect_synchrony(&batch);
        assert_eq!(signals.len(), 1);
        let expected: Vec<_> = batch.iter().map(|r| r.id).collect();
        assert_eq!(signals[0].evidence, expected);
    }
}
