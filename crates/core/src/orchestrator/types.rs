//! Types for the bulk orchestrator.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content_store::StoreError;
use crate::ledger::{LedgerError, LedgerIssuance};
use crate::notifier::NotificationOutcome;
use crate::renderer::RenderError;

/// Pipeline stage a job was in. Aborts can only happen in the first three;
/// Notifying always runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStage {
    Generating,
    Uploading,
    Committing,
    Notifying,
}

impl std::fmt::Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Generating => "generating",
            Self::Uploading => "uploading",
            Self::Committing => "committing",
            Self::Notifying => "notifying",
        };
        f.write_str(name)
    }
}

/// Component failure that aborted a job.
#[derive(Debug, Error)]
pub enum JobError {
    /// The batch itself was unacceptable; nothing was rendered.
    #[error("invalid batch: {0}")]
    Validation(String),

    /// Certificate rendering failed.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    /// An artifact upload failed.
    #[error("upload failed: {0}")]
    Upload(#[from] StoreError),

    /// The ledger commit failed; nothing was issued.
    #[error("ledger commit failed: {0}")]
    Commit(#[from] LedgerError),
}

impl JobError {
    /// Whether the failure was caller input rather than an upstream outage.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Upload(e) => e.is_validation(),
            Self::Commit(e) => e.is_validation(),
            Self::Render(_) => false,
        }
    }
}

/// Terminal state of a job that never reached `Done`.
///
/// Nothing was committed to the ledger and no notification was attempted;
/// artifacts uploaded before the failure remain orphaned in storage.
#[derive(Debug, Error)]
#[error("job aborted during {stage}: {reason}")]
pub struct JobAborted {
    /// Stage the job was in when it failed.
    pub stage: JobStage,
    /// Batch size the job was asked to issue.
    pub total: usize,
    /// The component failure.
    #[source]
    pub reason: JobError,
}

/// Aggregate result of a completed job. The only externally observable
/// artifact of a run besides the side effects themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkJobResult {
    pub total: usize,
    /// One issuance per request, index-aligned with the input.
    pub issuances: Vec<LedgerIssuance>,
    /// One outcome per request, index-aligned with the input.
    pub notifications: Vec<NotificationOutcome>,
    /// Notifications delivered.
    pub success_count: usize,
    /// Notifications failed or without recipient.
    pub failure_count: usize,
    /// The single transaction that issued the whole batch.
    pub transaction_ref: String,
}
