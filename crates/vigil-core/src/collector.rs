//! External-collector seam
//!
//! The engine makes no assumptions about how interaction data is fetched —
//! HTTP, subprocess bridge, or in-memory — only about the record shape. A
//! collector delivers batches of raw interactions; the orchestrator validates
//! them at the boundary. Collector failure is a per-cycle condition: the
//! orchestrator logs it and treats the cycle as "no data".

use async_trait::async_trait;

use crate::error::CollectorError;
use crate::types::RawInteraction;

/// Source of interaction batches
///
/// Implemented by live network sources and simulated/test sources alike; the
/// engine is indifferent to which variant supplies data.
#[async_trait]
pub trait Collector: Send {
    /// Pull the next batch of raw interactions
    ///
    /// An empty batch is a valid answer and simply means no activity was
    /// observed this cycle.
    async fn pull_batch(&mut self) -> Result<Vec<RawInteraction>, CollectorError>;
}

#[async_trait]
impl<C: Collector + ?Sized> Collector for Box<C> {
    async fn pull_batch(&mut self) -> Result<Vec<RawInteraction>, CollectorError> {
        (**self).pull_batch().await
    }
}

/// Collector over a fixed in-memory script of batches
///
/// Yields each scripted batch once, then empty batches forever. Useful for
/// tests and replay.
#[derive(Debug, Default)]
pub struct ScriptedCollector {
    batches: std::collections::VecDeque<Vec<RawInteraction>>,
}

impl ScriptedCollector {
    /// Create a collector that replays the given batches in order
    pub fn new(batches: Vec<Vec<RawInteraction>>) -> Self {
        Self {
            batches: batches.into(),
        }
    }
}

#[async_trait]
impl Collector for ScriptedCollector {
    async fn pull_batch(&mut self) -> Result<Vec<RawInteraction>, CollectorError> {
        Ok(self.batches.pop_front().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_collector_replays_then_drains() {
        let batch = vec![RawInteraction {
            agent_id: Some("a".to_string()),
            timestamp: Some(1),
            ..Default::default()
        }];
        let mut collector = ScriptedCollector::new(vec![batch.clone()]);
        assert_eq!(collector.pull_batch().await.unwrap().len(), 1);
        assert!(collector.pull_batch().await.unwrap().is_empty());
    }
}
