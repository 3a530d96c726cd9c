//! Mock ledger for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::ledger::{Ledger, LedgerError, LedgerIssuance};

/// A recorded bulk submission for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedSubmission {
    pub names: Vec<String>,
    pub reg_nos: Vec<String>,
    pub content_hashes: Vec<String>,
    pub issuer_label: String,
}

/// Mock implementation of the Ledger trait.
///
/// Assigns sequential IDs from a configurable base and stamps every
/// issuance with the same transaction ref, mirroring the one-transaction
/// batch contract.
#[derive(Debug, Clone)]
pub struct MockLedger {
    /// Recorded submissions (single and bulk).
    submissions: Arc<RwLock<Vec<RecordedSubmission>>>,
    /// If set, the next call fails with this error.
    next_error: Arc<RwLock<Option<LedgerError>>>,
    /// First sequential ID to assign.
    next_sequential_id: Arc<RwLock<u64>>,
    /// Transaction ref stamped on issuances, one per submission.
    transaction_counter: Arc<RwLock<u64>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    pub fn new() -> Self {
        Self {
            submissions: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            next_sequential_id: Arc::new(RwLock::new(1)),
            transaction_counter: Arc::new(RwLock::new(0)),
        }
    }

    /// Get all recorded submissions.
    pub async fn recorded_submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.read().await.clone()
    }

    /// Number of transactions submitted.
    pub async fn submission_count(&self) -> usize {
        self.submissions.read().await.len()
    }

    /// Configure the next call to fail.
    pub async fn set_next_error(&self, error: LedgerError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the first sequential ID the mock assigns.
    pub async fn set_next_sequential_id(&self, id: u64) {
        *self.next_sequential_id.write().await = id;
    }

    async fn submit(
        &self,
        names: &[String],
        reg_nos: &[String],
        content_hashes: &[String],
        issuer_label: &str,
    ) -> Result<Vec<LedgerIssuance>, LedgerError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let mut tx_counter = self.transaction_counter.write().await;
        *tx_counter += 1;
        let transaction_ref = format!("0xmocktx{:04}", *tx_counter);
        let block_ref = 1000 + *tx_counter;
        drop(tx_counter);

        let mut next_id = self.next_sequential_id.write().await;
        let first = *next_id;
        *next_id += names.len() as u64;
        drop(next_id);

        self.submissions.write().await.push(RecordedSubmission {
            names: names.to_vec(),
            reg_nos: reg_nos.to_vec(),
            content_hashes: content_hashes.to_vec(),
            issuer_label: issuer_label.to_string(),
        });

        Ok((0..names.len() as u64)
            .map(|offset| LedgerIssuance {
                sequential_id: first + offset,
                transaction_ref: transaction_ref.clone(),
                issuer_address: "0xmockissuer".to_string(),
                block_ref,
            })
            .collect())
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn issue(
        &self,
        name: &str,
        reg_no: &str,
        content_hash: &str,
        issuer_label: &str,
    ) -> Result<LedgerIssuance, LedgerError> {
        let mut issued = self
            .submit(
                &[name.to_string()],
                &[reg_no.to_string()],
                &[content_hash.to_string()],
                issuer_label,
            )
            .await?;
        Ok(issued.remove(0))
    }

    async fn bulk_issue(
        &self,
        names: &[String],
        reg_nos: &[String],
        content_hashes: &[String],
        issuer_label: &str,
    ) -> Result<Vec<LedgerIssuance>, LedgerError> {
        self.submit(names, reg_nos, content_hashes, issuer_label)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{}-{}", prefix, i)).collect()
    }

    #[tokio::test]
    async fn test_mock_ledger_assigns_sequential_ids_one_transaction() {
        let ledger = MockLedger::new();
        ledger.set_next_sequential_id(100).await;

        let issued = ledger
            .bulk_issue(&strings(3, "n"), &strings(3, "r"), &strings(3, "h"), "Acme")
            .await
            .unwrap();

        assert_eq!(issued.len(), 3);
        assert_eq!(issued[0].sequential_id, 100);
        assert_eq!(issued[2].sequential_id, 102);
        let tx = &issued[0].transaction_ref;
        assert!(issued.iter().all(|i| &i.transaction_ref == tx));
    }

    #[tokio::test]
    async fn test_mock_ledger_next_error_and_counts() {
        let ledger = MockLedger::new();
        ledger
            .set_next_error(LedgerError::Reverted {
                reason: "paused".to_string(),
            })
            .await;

        let result = ledger
            .bulk_issue(&strings(1, "n"), &strings(1, "r"), &strings(1, "h"), "Acme")
            .await;
        assert!(matches!(result, Err(LedgerError::Reverted { .. })));
        assert_eq!(ledger.submission_count().await, 0);

        let issued = ledger.issue("n", "r", "h", "Acme").await.unwrap();
        assert_eq!(issued.sequential_id, 1);
        assert_eq!(ledger.submission_count().await, 1);
    }
}
