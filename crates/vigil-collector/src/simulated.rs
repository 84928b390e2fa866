//! Simulated interaction source
//!
//! Generates plausible agent activity without any network access: a fixed
//! roster of known agents posting at roughly 12-second spacing with
//! gaussian response latencies. Used by the demo binary and anywhere a live
//! source is unavailable.

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vigil_core::error::CollectorError;
use vigil_core::types::RawInteraction;
use vigil_core::Collector;

/// Default roster of agents the simulator impersonates
const DEFAULT_AGENTS: &[&str] = &[
    "agentic_mira",
    "based-agent",
    "clanker",
    "askgina.eth",
    "bountybot",
];

const CHANNELS: &[&str] = &["ai-agents", "dev", "based"];
const KINDS: &[&str] = &["post", "like", "reshare", "reply"];

/// Spacing between simulated interactions, milliseconds
const INTERACTION_SPACING_MS: u64 = 12_000;

/// Mean and standard deviation of simulated response latency, milliseconds
const RESPONSE_MEAN_MS: f64 = 1500.0;
const RESPONSE_STDDEV_MS: f64 = 500.0;

/// Collector that fabricates interaction batches
#[derive(Debug)]
pub struct SimulatedCollector {
    agents: Vec<String>,
    batch_size: usize,
    rng: StdRng,
    next_timestamp: u64,
}

impl SimulatedCollector {
    /// Create a simulator with the default agent roster and batch size
    pub fn new() -> Self {
        Self::with_batch_size(25)
    }

    /// Create a simulator producing batches of the given size
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self {
            agents: DEFAULT_AGENTS.iter().map(|s| s.to_string()).collect(),
            batch_size,
            rng: StdRng::from_entropy(),
            next_timestamp: Utc::now().timestamp_millis().max(0) as u64,
        }
    }

    /// Create a deterministic simulator for tests
    pub fn seeded(seed: u64, batch_size: usize, start_timestamp: u64) -> Self {
        Self {
            agents: DEFAULT_AGENTS.iter().map(|s| s.to_string()).collect(),
            batch_size,
            rng: StdRng::seed_from_u64(seed),
            next_timestamp: start_timestamp,
        }
    }

    /// Replace the agent roster
    pub fn with_agents(mut self, agents: Vec<String>) -> Self {
        self.agents = agents;
        self
    }

    /// Gaussian sample via Box-Muller; good enough for synthetic latencies
    fn gaussian(&mut self, mean: f64, stddev: f64) -> f64 {
        let u1: f64 = self.rng.gen_range(f64::EPSILON..1.0);
        let u2: f64 = self.rng.gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
        mean + stddev * z
    }

    fn next_interaction(&mut self) -> RawInteraction {
        let timestamp = self.next_timestamp;
        self.next_timestamp += INTERACTION_SPACING_MS;

        let agent_idx = self.rng.gen_range(0..self.agents.len());
        let agent = self.agents[agent_idx].clone();
        let target = if self.rng.gen_bool(0.7) {
            let idx = self.rng.gen_range(0..self.agents.len());
            Some(self.agents[idx].clone())
        } else {
            None
        };
        let channel = if self.rng.gen_bool(0.75) {
            let idx = self.rng.gen_range(0..CHANNELS.len());
            Some(CHANNELS[idx].to_string())
        } else {
            None
        };
        let kind = KINDS[self.rng.gen_range(0..KINDS.len())];
        let content_len = self.rng.gen_range(50..=280);
        let response_time = self
            .gaussian(RESPONSE_MEAN_MS, RESPONSE_STDDEV_MS)
            .max(0.0);

        RawInteraction {
            agent_id: Some(agent),
            interaction_type: Some(kind.to_string()),
            timestamp: Some(timestamp),
            target_agent: target,
            response_time: Some(response_time),
            content: Some("x".repeat(content_len)),
            likes: Some(self.rng.gen_range(0..30)),
            reshares: Some(self.rng.gen_range(0..10)),
            replies: Some(self.rng.gen_range(0..10)),
            channel,
        }
    }
}

impl Default for SimulatedCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for SimulatedCollector {
    async fn pull_batch(&mut self) -> Result<Vec<RawInteraction>, CollectorError> {
        let batch: Vec<RawInteraction> =
            (0..self.batch_size).map(|_| self.next_interaction()).collect();
        tracing::debug!(count = batch.len(), "Simulated interaction batch");
        Ok(batch)
    }
}
