//! Types for the ledger client.

use serde::{Deserialize, Serialize};

/// Hard cap on records per ledger transaction.
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 100;

/// One issued record as confirmed on the ledger.
///
/// A bulk call produces one `transaction_ref` shared by every issuance;
/// `sequential_id`s align positionally with the submitted records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerIssuance {
    /// Registry-assigned sequential certificate ID.
    pub sequential_id: u64,
    /// Reference of the confirmed transaction that issued this record.
    pub transaction_ref: String,
    /// Address of the signing identity.
    pub issuer_address: String,
    /// Block the transaction was recorded in.
    pub block_ref: u64,
}

/// One record to register, in submission order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceRecord {
    pub name: String,
    pub reg_no: String,
    pub content_hash: String,
}

/// Ledger client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Registry node JSON-RPC endpoint.
    pub rpc_url: String,
    /// Hex-encoded ed25519 signing key of the issuer identity.
    pub signing_key: String,
    /// Per-request RPC timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// Interval between confirmation polls in milliseconds (default: 500).
    #[serde(default = "default_poll_interval")]
    pub confirm_poll_interval_ms: u64,
    /// Upper bound on the confirmation wait in seconds (default: 120).
    #[serde(default = "default_confirm_timeout")]
    pub confirm_timeout_secs: u64,
    /// Maximum records per transaction (default: 100).
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
}

fn default_timeout() -> u32 {
    30
}

fn default_poll_interval() -> u64 {
    500
}

fn default_confirm_timeout() -> u64 {
    120
}

fn default_max_batch_items() -> usize {
    DEFAULT_MAX_BATCH_ITEMS
}
