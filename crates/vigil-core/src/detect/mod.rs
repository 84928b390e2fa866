//! Coordination-pattern detectors
//!
//! Four independent analyzers scan a batch of interaction records and emit
//! typed [`CoordinationSignal`]s:
//!
//! - **Synchrony**: many agents posting inside the same short time bucket
//! - **Echo**: multiple agents posting near-identical content
//! - **Cascade**: engagement accumulating implausibly fast on one record
//! - **Swarm**: agent-like accounts acting in timestamp lockstep
//!
//! Every detector is stateless per call: it receives an immutable batch
//! snapshot, never the live window, and writes nothing back. Strengths are
//! clipped to [0, 1] and ties are broken by stable arrival order.

mod cascade;
mod echo;
mod swarm;
mod synchrony;

pub use cascade::{detect_cascades, ENGAGEMENT_FLOOR, RATE_THRESHOLD};
pub use echo::{batch_similarity, detect_echoes, ECHO_GROUP_MIN};
pub use swarm::{detect_swarms, SWARM_MIN_SIZE, TIMESTAMP_VARIANCE_CEILING};
pub use synchrony::{
    detect_synchrony, detect_synchrony_with_bucket, SYNC_BUCKET_WIDTH_MS, SYNC_BUCKET_MIN,
};

use crate::types::{CoordinationSignal, InteractionRecord};

/// Run all detectors against one batch snapshot
///
/// `now_ms` is the caller's notion of the current time in the batch's
/// timestamp unit; the cascade detector needs it to compute engagement rates.
/// Output order is detector order (synchrony, echo, cascade, swarm), then
/// arrival order within each detector.
pub fn detect_all(batch: &[InteractionRecord], now_ms: u64) -> Vec<CoordinationSignal> {
    let mut signals = detect_synchrony(batch);
    signals.extend(detect_echoes(batch));
    signals.extend(detect_cascades(batch, now_ms));
    signals.extend(detect_swarms(batch));
    signals
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::types::{Engagement, InteractionKind, InteractionRecord};
    use uuid::Uuid;

    /// Minimal record for detector tests
    pub fn record(agent: &str, ts: u64) -> InteractionRecord {
        InteractionRecord {
            id: Uuid::new_v4(),
            agent_id: agent.to_string(),
            kind: InteractionKind::Post,
            timestamp: ts,
            target_agent: None,
            response_time_ms: 0.0,
            content: String::new(),
            engagement: Engagement::default(),
            channel: None,
        }
    }

    pub fn record_with_content(agent: &str, ts: u64, content: &str) -> InteractionRecord {
        let mut r = record(agent, ts);
        r.content = content.to_string();
        r
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{record, record_with_content};
    use super::*;
    use crate::types::SignalType;

    #[test]
    fn test_detect_all_merges_in_detector_order() {
        // Four posts in one bucket trip synchrony; three of them share
        // content, tripping echo in the same pass.
        let batch = vec![
            record_with_content("bot-alpha", 1_000, "the protocol upgrade is live right now"),
            record_with_content("bot-beta", 1_100, "the protocol upgrade is live right now"),
            record_with_content("ai_gamma", 1_200, "the protocol upgrade is live right now"),
            record("human_dave", 1_300),
        ];
        let signals = detect_all(&batch, 2_000);

        let types: Vec<SignalType> = signals.iter().map(|s| s.signal_type).collect();
        assert!(types.contains(&SignalType::Synchrony));
        assert!(types.contains(&SignalType::Echo));
        // Detector order is stable: synchrony signals precede echo signals.
        let sync_pos = types.iter().position(|t| *t == SignalType::Synchrony).unwrap();
        let echo_pos = types.iter().position(|t| *t == SignalType::Echo).unwrap();
        assert!(sync_pos < echo_pos);
    }

    #[test]
    fn test_detect_all_empty_batch() {
        assert!(detect_all(&[], 0).is_empty());
    }

    #[test]
    fn test_all_strengths_clipped() {
        let mut batch: Vec<_> = (0..50)
            .map(|i| {
                record_with_content(
                    &format!("bot-{i}"),
                    1_000 + i,
                    "coordinated message repeated verbatim across many accounts",
                )
            })
            .collect();
        for r in &mut batch {
            r.engagement.likes = 10_000;
        }
        for signal in detect_all(&batch, 1_100) {
            assert!(
                (0.0..=1.0).contains(&signal.strength),
                "strength out of range: {}",
                signal.strength
            );
        }
    }
}
