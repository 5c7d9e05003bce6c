//! Service and scoring configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ============================================================================
// Scoring Configuration
// ============================================================================

/// Batch scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Score instances of one batch in parallel (default: true).
    pub parallel: bool,
    /// Batches smaller than this are scored sequentially (default: 64).
    pub min_parallel_batch: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_batch: 64,
        }
    }
}

impl ScoringConfig {
    /// Sequential scoring regardless of batch size.
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Whether a batch of `len` instances should be scored in parallel.
    pub fn use_parallel(&self, len: usize) -> bool {
        self.parallel && len >= self.min_parallel_batch.max(2)
    }
}

// ============================================================================
// Service Configuration
// ============================================================================

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind host (default: 0.0.0.0).
    pub host: String,
    /// Bind port (default: 8080).
    pub port: u16,
    /// Path of the model bundle loaded at startup.
    pub bundle_path: PathBuf,
    /// Overrides the bundle's own model identifier when set.
    pub model_id: Option<String>,
    /// Largest accepted batch; `None` disables the limit (default: 10 000).
    pub max_batch_size: Option<usize>,
    pub scoring: ScoringConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            bundle_path: PathBuf::from("model/bundle.json"),
            model_id: None,
            max_batch_size: Some(10_000),
            scoring: ScoringConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
