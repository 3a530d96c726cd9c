//! Configuration for the bulk orchestrator.

use serde::{Deserialize, Serialize};

use crate::compressor::CompressorConfig;
use crate::ledger::DEFAULT_MAX_BATCH_ITEMS;
use crate::notifier::DispatchConfig;

/// Knobs for one orchestrator instance. Everything is independently
/// overridable from the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Artifact size normalization parameters.
    #[serde(default)]
    pub compressor: CompressorConfig,
    /// Notification pacing parameters.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Largest batch accepted into a job (default: 100, the ledger
    /// transaction cap). Checked before anything renders so an oversized
    /// batch cannot orphan storage.
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            compressor: CompressorConfig::default(),
            dispatch: DispatchConfig::default(),
            max_batch_items: default_max_batch_items(),
        }
    }
}

fn default_max_batch_items() -> usize {
    DEFAULT_MAX_BATCH_ITEMS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.max_batch_items, 100);
        assert_eq!(config.compressor.target_bytes, 200 * 1024);
        assert_eq!(config.dispatch.email_delay_ms, 200);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: OrchestratorConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_batch_items, 100);
        assert_eq!(config.dispatch.batch_delay_ms, 2000);
    }
}
