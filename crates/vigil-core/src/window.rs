//! Sliding window of recent interaction records
//!
//! The window is a bounded FIFO buffer: admitting a record beyond capacity
//! evicts the oldest. Insertion order reflects arrival order, not necessarily
//! timestamp order; the engine does not re-sort.

use std::collections::VecDeque;

use crate::error::ConfigError;
use crate::types::InteractionRecord;

/// Bounded, FIFO-evicting buffer of recent interaction records
#[derive(Debug, Clone)]
pub struct WindowStore {
    records: VecDeque<InteractionRecord>,
    capacity: usize,
}

impl WindowStore {
    /// Create a window with the given capacity
    ///
    /// Fails fast on zero capacity: that is a programming error, not a
    /// runtime data condition.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroWindowCapacity);
        }
        Ok(Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        })
    }

    /// Append one record, evicting the oldest if the window is full
    pub fn admit(&mut self, record: InteractionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Current contents in arrival order
    ///
    /// Returns an owned copy so callers can hand detectors an immutable batch
    /// without exposing the live buffer to mutation.
    pub fn snapshot(&self) -> Vec<InteractionRecord> {
        self.records.iter().cloned().collect()
    }

    /// Iterate over the contents in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.records.iter()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the window is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Engagement, InteractionKind};
    use uuid::Uuid;

    fn record(agent: &str, ts: u64) -> InteractionRecord {
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

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(WindowStore::new(0).is_err());
    }

    #[test]
    fn test_admit_and_snapshot_preserve_arrival_order() {
        let mut window = WindowStore::new(10).unwrap();
        for ts in [30, 10, 20] {
            window.admit(record("a", ts));
        }
        let timestamps: Vec<u64> = window.snapshot().iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![30, 10, 20]);
    }

    #[test]
    fn test_eviction_drops_oldest() {
        let mut window = WindowStore::new(3).unwrap();
        for ts in 0..5 {
            window.admit(record("a", ts));
        }
        assert_eq!(window.len(), 3);
        let timestamps: Vec<u64> = window.snapshot().iter().map(|r| r.timestamp).collect();
        assert_eq!(timestamps, vec![2, 3, 4]);
    }

    #[test]
    fn test_capacity_one() {
        let mut window = WindowStore::new(1).unwrap();
        window.admit(record("a", 1));
        window.admit(record("b", 2));
        assert_eq!(window.len(), 1);
        assert_eq!(window.snapshot()[0].agent_id, "b");
    }
}
