//! Registry client: one signed transaction per batch, confirmed before
//! returning, sequential IDs decoded from the receipt's event log.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration, Instant};
use tracing::{debug, info, warn};

use async_trait::async_trait;

use super::rpc::RpcClient;
use super::signer::IssuerSigner;
use super::types::{IssuanceRecord, LedgerConfig, LedgerIssuance};
use super::{Ledger, LedgerError};

/// Event name the registry emits once per issued record.
const ISSUANCE_EVENT: &str = "certificate.issued";

/// Client for the certificate registry ledger.
///
/// The nonce slot doubles as the submission lock: the guard is held from
/// nonce assignment through confirmation, so two transactions are never in
/// flight concurrently for this identity.
pub struct LedgerClient {
    rpc: RpcClient,
    signer: IssuerSigner,
    config: LedgerConfig,
    nonce: Mutex<Option<u64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResult {
    transaction_ref: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Receipt {
    status: ReceiptStatus,
    #[serde(default)]
    block_ref: u64,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    logs: Vec<LogEntry>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum ReceiptStatus {
    Confirmed,
    Reverted,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    event: String,
    #[serde(default)]
    data: Value,
}

impl LedgerClient {
    pub fn new(config: LedgerConfig) -> Result<Self, LedgerError> {
        let signer = IssuerSigner::from_hex(&config.signing_key)?;
        let rpc = RpcClient::new(&config.rpc_url, config.timeout_secs)?;
        Ok(Self {
            rpc,
            signer,
            config,
            nonce: Mutex::new(None),
        })
    }

    /// The address this client signs with.
    pub fn issuer_address(&self) -> &str {
        self.signer.address()
    }
}

#[async_trait]
impl Ledger for LedgerClient {
    /// Issue a single certificate record.
    async fn issue(
        &self,
        name: &str,
        reg_no: &str,
        content_hash: &str,
        issuer_label: &str,
    ) -> Result<LedgerIssuance, LedgerError> {
        let records = vec![IssuanceRecord {
            name: name.to_string(),
            reg_no: reg_no.to_string(),
            content_hash: content_hash.to_string(),
        }];
        let mut issued = self.submit_records(records, issuer_label).await?;
        issued
            .pop()
            .ok_or_else(|| LedgerError::EventMismatch {
                expected: 1,
                actual: 0,
            })
    }

    /// Issue a whole batch as one transaction.
    ///
    /// The three arrays must be equal-length, non-empty and within
    /// `max_batch_items`; all of that is checked before any signing or
    /// network traffic.
    async fn bulk_issue(
        &self,
        names: &[String],
        reg_nos: &[String],
        content_hashes: &[String],
        issuer_label: &str,
    ) -> Result<Vec<LedgerIssuance>, LedgerError> {
        if names.len() != reg_nos.len() || names.len() != content_hashes.len() {
            return Err(LedgerError::Validation(format!(
                "array length mismatch: {} names, {} registration ids, {} hashes",
                names.len(),
                reg_nos.len(),
                content_hashes.len()
            )));
        }
        if names.is_empty() {
            return Err(LedgerError::Validation("batch is empty".to_string()));
        }
        if names.len() > self.config.max_batch_items {
            return Err(LedgerError::Validation(format!(
                "batch of {} exceeds the {}-record transaction cap",
                names.len(),
                self.config.max_batch_items
            )));
        }

        let records = names
            .iter()
            .zip(reg_nos)
            .zip(content_hashes)
            .map(|((name, reg_no), content_hash)| IssuanceRecord {
                name: name.clone(),
                reg_no: reg_no.clone(),
                content_hash: content_hash.clone(),
            })
            .collect();

        self.submit_records(records, issuer_label).await
    }
}

impl LedgerClient {
    /// Sign, submit and confirm one transaction carrying `records`.
    async fn submit_records(
        &self,
        records: Vec<IssuanceRecord>,
        issuer_label: &str,
    ) -> Result<Vec<LedgerIssuance>, LedgerError> {
        let expected = records.len();

        // Guard held until confirmation: nonce safety and submission
        // serialization in one place.
        let mut nonce_slot = self.nonce.lock().await;
        let nonce = match *nonce_slot {
            Some(n) => n,
            None => {
                let n = self.fetch_account_nonce().await?;
                *nonce_slot = Some(n);
                n
            }
        };

        let payload = json!({
            "issuer": self.signer.address(),
            "nonce": nonce,
            "issuerLabel": issuer_label,
            "records": records,
        });
        let payload_bytes = serde_json::to_vec(&payload)
            .map_err(|e| LedgerError::ParseError(e.to_string()))?;
        let signature = self.signer.sign_payload(&payload_bytes);

        debug!(records = expected, nonce, "submitting issuance transaction");

        let submit_result = self
            .rpc
            .call(
                "registry_submitTransaction",
                json!([{
                    "payload": payload,
                    "signature": signature,
                    "publicKey": self.signer.public_key_hex(),
                }]),
            )
            .await;

        let submitted: SubmitResult = match submit_result {
            Ok(value) => serde_json::from_value(value)
                .map_err(|e| LedgerError::ParseError(e.to_string()))?,
            Err(e) => {
                // The node may or may not have seen this nonce; re-read the
                // account on the next submission instead of guessing.
                *nonce_slot = None;
                return Err(e);
            }
        };
        *nonce_slot = Some(nonce + 1);

        info!(
            transaction_ref = %submitted.transaction_ref,
            records = expected,
            "transaction submitted, awaiting confirmation"
        );

        let receipt = self.await_confirmation(&submitted.transaction_ref).await?;

        if receipt.status == ReceiptStatus::Reverted {
            return Err(LedgerError::Reverted {
                reason: receipt
                    .reason
                    .unwrap_or_else(|| "no reason given".to_string()),
            });
        }

        let ids = extract_sequential_ids(&receipt.logs);
        // Positional alignment with the input is assumed from the node's
        // emission order; the count check keeps that assumption honest.
        if ids.len() != expected {
            warn!(
                expected,
                actual = ids.len(),
                transaction_ref = %submitted.transaction_ref,
                "issuance event count does not match submitted records"
            );
            return Err(LedgerError::EventMismatch {
                expected,
                actual: ids.len(),
            });
        }

        info!(
            transaction_ref = %submitted.transaction_ref,
            block_ref = receipt.block_ref,
            "transaction confirmed"
        );

        Ok(ids
            .into_iter()
            .map(|sequential_id| LedgerIssuance {
                sequential_id,
                transaction_ref: submitted.transaction_ref.clone(),
                issuer_address: self.signer.address().to_string(),
                block_ref: receipt.block_ref,
            })
            .collect())
    }

    async fn fetch_account_nonce(&self) -> Result<u64, LedgerError> {
        let account = self
            .rpc
            .call("registry_getAccount", json!([self.signer.address()]))
            .await?;
        account["nonce"]
            .as_u64()
            .ok_or_else(|| LedgerError::ParseError("account nonce missing".to_string()))
    }

    /// Poll the node until the transaction is mined or the confirmation
    /// window closes.
    async fn await_confirmation(&self, transaction_ref: &str) -> Result<Receipt, LedgerError> {
        let deadline = Instant::now() + Duration::from_secs(self.config.confirm_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.confirm_poll_interval_ms);

        loop {
            let value = self
                .rpc
                .call("registry_getReceipt", json!([transaction_ref]))
                .await?;

            if !value.is_null() {
                return serde_json::from_value(value)
                    .map_err(|e| LedgerError::ParseError(e.to_string()));
            }

            if Instant::now() >= deadline {
                return Err(LedgerError::ConfirmationTimeout {
                    secs: self.config.confirm_timeout_secs,
                });
            }
            sleep(poll_interval).await;
        }
    }
}

/// Collect sequential IDs from issuance events, in log order.
fn extract_sequential_ids(logs: &[LogEntry]) -> Vec<u64> {
    logs.iter()
        .filter(|entry| entry.event == ISSUANCE_EVENT)
        .filter_map(|entry| entry.data["sequentialId"].as_u64())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LedgerConfig {
        LedgerConfig {
            rpc_url: "http://localhost:1".to_string(),
            signing_key: hex::encode([7u8; 32]),
            timeout_secs: 1,
            confirm_poll_interval_ms: 10,
            confirm_timeout_secs: 1,
            max_batch_items: 100,
        }
    }

    fn strings(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
    }

    #[tokio::test]
    async fn test_bulk_issue_rejects_length_mismatch() {
        let client = LedgerClient::new(test_config()).unwrap();
        let result = client
            .bulk_issue(&strings(3, "n"), &strings(2, "r"), &strings(3, "h"), "lbl")
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_issue_rejects_empty_batch() {
        let client = LedgerClient::new(test_config()).unwrap();
        let result = client.bulk_issue(&[], &[], &[], "lbl").await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bulk_issue_rejects_oversized_batch() {
        let client = LedgerClient::new(test_config()).unwrap();
        let result = client
            .bulk_issue(
                &strings(101, "n"),
                &strings(101, "r"),
                &strings(101, "h"),
                "lbl",
            )
            .await;
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_extract_sequential_ids_filters_and_orders() {
        let logs = vec![
            LogEntry {
                event: "certificate.issued".to_string(),
                data: json!({"sequentialId": 11}),
            },
            LogEntry {
                event: "fee.charged".to_string(),
                data: json!({"amount": 3}),
            },
            LogEntry {
                event: "certificate.issued".to_string(),
                data: json!({"sequentialId": 12}),
            },
        ];
        assert_eq!(extract_sequential_ids(&logs), vec![11, 12]);
    }

    #[test]
    fn test_receipt_parses_reverted() {
        let raw = r#"{"status":"reverted","reason":"registry paused","logs":[]}"#;
        let receipt: Receipt = serde_json::from_str(raw).unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Reverted);
        assert_eq!(receipt.reason.as_deref(), Some("registry paused"));
    }

    #[test]
    fn test_receipt_parses_confirmed_with_logs() {
        let raw = r#"{
            "status": "confirmed",
            "blockRef": 99,
            "logs": [{"event": "certificate.issued", "data": {"sequentialId": 5}}]
        }"#;
        let receipt: Receipt = serde_json::from_str(raw).unwrap();
        assert_eq!(receipt.status, ReceiptStatus::Confirmed);
        assert_eq!(receipt.block_ref, 99);
        assert_eq!(extract_sequential_ids(&receipt.logs), vec![5]);
    }
}
