use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Required sections exist (enforced by serde)
/// - Server port is not 0
/// - Signing key decodes to a 32-byte ed25519 secret
/// - Pipeline batch cap does not exceed the ledger transaction cap
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    let key = config.ledger.signing_key.trim();
    match hex::decode(key) {
        Ok(raw) if raw.len() == 32 => {}
        Ok(raw) => {
            return Err(ConfigError::ValidationError(format!(
                "ledger.signing_key must be 32 bytes, got {}",
                raw.len()
            )));
        }
        Err(e) => {
            return Err(ConfigError::ValidationError(format!(
                "ledger.signing_key is not valid hex: {}",
                e
            )));
        }
    }

    if config.pipeline.max_batch_items > config.ledger.max_batch_items {
        return Err(ConfigError::ValidationError(format!(
            "pipeline.max_batch_items ({}) exceeds ledger.max_batch_items ({})",
            config.pipeline.max_batch_items, config.ledger.max_batch_items
        )));
    }

    Ok(())
}
