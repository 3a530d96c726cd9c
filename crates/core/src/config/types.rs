use serde::{Deserialize, Serialize};
use std::net::IpAddr;

use crate::content_store::StoreConfig;
use crate::ledger::LedgerConfig;
use crate::notifier::MailerConfig;
use crate::orchestrator::OrchestratorConfig;
use crate::renderer::RendererConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    pub storage: StoreConfig,
    pub ledger: LedgerConfig,
    pub mailer: MailerConfig,
    #[serde(default)]
    pub pipeline: OrchestratorConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub renderer: RendererConfig,
    pub storage: SanitizedStoreConfig,
    pub ledger: SanitizedLedgerConfig,
    pub mailer: SanitizedMailerConfig,
    pub pipeline: OrchestratorConfig,
}

/// Sanitized storage config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedStoreConfig {
    pub api_url: String,
    pub gateway_url: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
    pub max_upload_bytes: usize,
}

/// Sanitized ledger config (signing key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLedgerConfig {
    pub rpc_url: String,
    pub signing_key_configured: bool,
    pub timeout_secs: u32,
    pub confirm_timeout_secs: u64,
    pub max_batch_items: usize,
}

/// Sanitized mailer config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMailerConfig {
    pub api_url: String,
    pub sender: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            renderer: config.renderer.clone(),
            storage: SanitizedStoreConfig {
                api_url: config.storage.api_url.clone(),
                gateway_url: config.storage.gateway_url.clone(),
                api_key_configured: !config.storage.api_key.is_empty(),
                timeout_secs: config.storage.timeout_secs,
                max_upload_bytes: config.storage.max_upload_bytes,
            },
            ledger: SanitizedLedgerConfig {
                rpc_url: config.ledger.rpc_url.clone(),
                signing_key_configured: !config.ledger.signing_key.is_empty(),
                timeout_secs: config.ledger.timeout_secs,
                confirm_timeout_secs: config.ledger.confirm_timeout_secs,
                max_batch_items: config.ledger.max_batch_items,
            },
            mailer: SanitizedMailerConfig {
                api_url: config.mailer.api_url.clone(),
                sender: config.mailer.sender.clone(),
                api_key_configured: !config.mailer.api_key.is_empty(),
                timeout_secs: config.mailer.timeout_secs,
            },
            pipeline: config.pipeline.clone(),
        }
    }
}
