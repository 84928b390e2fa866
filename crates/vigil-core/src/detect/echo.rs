//! Echo-chamber detection via content similarity
//!
//! Groups records by a short normalized content prefix; several agents
//! posting content that starts identically is a cheap but effective proxy
//! for copy-paste amplification. A separate pairwise Jaccard score over the
//! whole batch feeds diagnostics.

use chrono::Utc;
use std::collections::{BTreeSet, HashMap};

use crate::types::{CoordinationSignal, InteractionRecord, SignalType};

/// Minimum records sharing a prefix key before the group qualifies
pub const ECHO_GROUP_MIN: usize = 3;

/// Minimum distinct agents in a qualifying group
const MIN_DISTINCT_AGENTS: usize = 2;

/// Length of the normalized content prefix used as the grouping key
const PREFIX_LEN: usize = 20;

/// Prefix keys shorter than this are too generic to group on
const MIN_KEY_LEN: usize = 6;

fn prefix_key(content: &str) -> Option<String> {
    let key: String = content.trim().to_lowercase().chars().take(PREFIX_LEN).collect();
    // Character count, not byte length: a short multibyte key is still short.
    if key.chars().count() < MIN_KEY_LEN {
        None
    } else {
        Some(key)
    }
}

/// Detect echo groups: multiple agents posting near-identical content
pub fn detect_echoes(batch: &[InteractionRecord]) -> Vec<CoordinationSignal> {
    let mut groups: HashMap<String, Vec<&InteractionRecord>> = HashMap::new();
    // Track first-seen key order so output follows arrival order, not hash order.
    let mut key_order: Vec<String> = Vec::new();

    for record in batch {
        if let Some(key) = prefix_key(&record.content) {
            let group = groups.entry(key.clone()).or_insert_with(|| {
                key_order.push(key);
                Vec::new()
            });
            group.push(record);
        }
    }

    let mut signals = Vec::new();
    for key in &key_order {
        let group = &groups[key];
        if group.len() < ECHO_GROUP_MIN {
            continue;
        }
        let participants: BTreeSet<String> = group.iter().map(|r| r.agent_id.clone()).collect();
        if participants.len() < MIN_DISTINCT_AGENTS {
            continue;
        }
        let strength = (group.len() as f64 / 5.0).min(1.0);
        signals.push(CoordinationSignal {
            signal_type: SignalType::Echo,
            strength,
            participants,
            evidence: group.iter().map(|r| r.id).collect(),
            detected_at: Utc::now(),
        });
    }
    signals
}

/// Mean pairwise Jaccard similarity of whitespace-tokenized, lower-cased
/// content across all record pairs in the batch
///
/// 0.0 when fewer than two records carry tokens.
pub fn batch_similarity(batch: &[InteractionRecord]) -> f64 {
    // Lower-case once up front; split borrows from these owned strings.
    let lowered: Vec<String> = batch.iter().map(|r| r.content.to_lowercase()).collect();
    let sets: Vec<BTreeSet<&str>> = lowered
        .iter()
        .map(|c| c.split_whitespace().collect())
        .collect();

    let mut total = 0.0;
    let mut comparisons = 0usize;
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len() {
            if sets[i].is_empty() || sets[j].is_empty() {
                continue;
            }
            let intersection = sets[i].intersection(&sets[j]).count();
            let union = sets[i].union(&sets[j]).count();
            if union > 0 {
                total += intersection as f64 / union as f64;
                comparisons += 1;
            }
        }
    }
    if comparisons == 0 {
        0.0
    } else {
        total / comparisons as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::testing::record_with_content;

    #[test]
    fn test_three_agents_identical_prefix_qualify() {
        let batch = vec![
            record_with_content("a", 0, "Breaking news: token launched today"),
            record_with_content("b", 1, "breaking news: token launched this hour"),
            record_with_content("c", 2, "BREAKING NEWS: token launched again"),
        ];
        let signals = detect_echoes(&batch);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].strength, 0.6);
        assert_eq!(signals[0].participants.len(), 3);
    }

    #[test]
    fn test_short_content_is_ignored() {
        let batch = vec![
            record_with_content("a", 0, "gm"),
            record_with_content("b", 1, "gm"),
            record_with_content("c", 2, "gm"),
        ];
        assert!(detect_echoes(&batch).is_empty());
    }

    #[test]
    fn test_short_multibyte_content_is_ignored() {
        // Five characters, fifteen bytes: still under the key floor.
        let batch = vec![
            record_with_content("a", 0, "早上好世界"),
            record_with_content("b", 1, "早上好世界"),
            record_with_content("c", 2, "早上好世界"),
        ];
        assert!(detect_echoes(&batch).is_empty());
    }

    #[test]
    fn test_single_agent_echo_is_ignored() {
        let batch = vec![
            record_with_content("a", 0, "same long message repeated"),
            record_with_content("a", 1, "same long message repeated"),
            record_with_content("a", 2, "same long message repeated"),
        ];
        assert!(detect_echoes(&batch).is_empty());
    }

    #[test]
    fn test_strength_caps_at_one() {
        let batch: Vec<_> = (0..8)
            .map(|i| record_with_content(&format!("agent{i}"), i, "identical broadcast text"))
            .collect();
        let signals = detect_echoes(&batch);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].strength, 1.0);
    }

    #[test]
    fn test_batch_similarity_identical_content() {
        let batch = vec![
            record_with_content("a", 0, "alpha beta gamma"),
            record_with_content("b", 1, "alpha beta gamma"),
        ];
        assert!((batch_similarity(&batch) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_batch_similarity_disjoint_content() {
        let batch = vec![
            record_with_content("a", 0, "alpha beta"),
            record_with_content("b", 1, "gamma delta"),
        ];
        assert_eq!(batch_similarity(&batch), 0.0);
    }

    #[test]
    fn test_batch_similarity_empty_batch() {
        assert_eq!(batch_similarity(&[]), 0.0);
    }

    #[test]
    fn test_batch_similarity_is_case_insensitive() {
        let batch = vec![
            record_with_content("a", 0, "Hello World"),
            record_with_content("b", 1, "hello world"),
        ];
        assert!((batch_similarity(&batch) - 1.0).abs() < 1e-12);
    }
}
