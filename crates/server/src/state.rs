use std::sync::Arc;

use certo_core::{BulkOrchestrator, Config, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<BulkOrchestrator>,
    /// Names of the wired client implementations, reported by /health.
    client_names: ClientNames,
}

/// Implementation names of the injected clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ClientNames {
    pub renderer: String,
    pub content_store: String,
    pub mail_transport: String,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<BulkOrchestrator>, client_names: ClientNames) -> Self {
        Self {
            config,
            orchestrator,
            client_names,
        }
    }

    pub fn orchestrator(&self) -> &BulkOrchestrator {
        self.orchestrator.as_ref()
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn client_names(&self) -> &ClientNames {
        &self.client_names
    }
}
