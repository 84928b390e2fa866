//! HTTP interaction source
//!
//! Polls a JSON endpoint that exposes recent network activity as an array of
//! raw interactions. Transport and decode failures are mapped to
//! [`CollectorError`] so the orchestrator can treat a bad cycle as "no data"
//! and keep running.

use async_trait::async_trait;
use std::time::Duration;

use vigil_core::error::CollectorError;
use vigil_core::types::RawInteraction;
use vigil_core::Collector;

/// Default per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Collector that polls an HTTP endpoint for interaction batches
#[derive(Debug, Clone)]
pub struct HttpCollector {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCollector {
    /// Create a collector polling the given endpoint
    ///
    /// The endpoint must answer GET with a JSON array of raw interactions.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, CollectorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CollectorError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The endpoint this collector polls
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Collector for HttpCollector {
    async fn pull_batch(&mut self) -> Result<Vec<RawInteraction>, CollectorError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| CollectorError::Transport(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| CollectorError::Transport(e.to_string()))?;

        let batch: Vec<RawInteraction> = response
            .json()
            .await
            .map_err(|e| CollectorError::Decode(e.to_string()))?;

        tracing::debug!(count = batch.len(), endpoint = %self.endpoint, "Pulled interaction batch");
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_keeps_endpoint() {
        let collector = HttpCollector::new("http://localhost:8080/interactions").unwrap();
        assert_eq!(collector.endpoint(), "http://localhost:8080/interactions");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Reserved TEST-NET-1 address: connection fails fast.
        let mut collector = HttpCollector::new("http://192.0.2.1:1/interactions").unwrap();
        let err = collector.pull_batch().await.unwrap_err();
        assert!(matches!(err, CollectorError::Transport(_)));
    }
}
