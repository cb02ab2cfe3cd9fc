use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

/// Default maximum number of stages in one flowchart.
pub const DEFAULT_MAX_STAGES: usize = 50;
/// Default maximum number of nodes in one flowchart.
pub const DEFAULT_MAX_NODES: usize = 200;
/// Default maximum size of the raw editor payload (10 MiB).
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied while binding and resolving flowchart content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub max_stages: usize,
    pub max_nodes: usize,
    pub max_content_bytes: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_stages: DEFAULT_MAX_STAGES,
            max_nodes: DEFAULT_MAX_NODES,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }
}

/// How often a conditional write is attempted and how long to wait in between.
///
/// The back-off before each retry is drawn uniformly from
/// `min_backoff_ms..=max_backoff_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub min_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            min_backoff_ms: 100,
            max_backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    /// A policy that retries immediately. Useful for tests.
    pub fn immediate(attempts: u32) -> Self {
        Self {
            attempts,
            min_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }

    /// Number of write attempts to make. A policy always makes at least one.
    pub fn attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    pub fn backoff(&self, rng: &mut impl rand::Rng) -> Duration {
        let low = self.min_backoff_ms.min(self.max_backoff_ms);
        let high = self.min_backoff_ms.max(self.max_backoff_ms);
        Duration::from_millis(rng.random_range(low..=high))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub retry: RetryPolicy,
}

/// Combined configuration, as read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowchartConfig {
    pub resolver: ResolverConfig,
    pub coordinator: CoordinatorConfig,
}

impl FlowchartConfig {
    /// Load configuration from a JSON file. Missing fields fall back to defaults.
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(serde_json::from_str(json)?)
    }
}
