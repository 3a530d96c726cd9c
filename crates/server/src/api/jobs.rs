//! Bulk issuance job endpoint.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use certo_core::{BulkJobResult, IssuanceRequest, JobAborted, JobStage};

use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BulkIssueRequest {
    /// Human-readable issuer identity recorded on each certificate.
    pub issuer_label: String,
    /// Ordered batch, at most the configured cap (default 100).
    pub requests: Vec<IssuanceRequest>,
}

/// `Done` and `Aborted` are deliberately distinct shapes: an aborted job
/// issued nothing, a done job issued everything even if some emails
/// failed.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BulkIssueResponse {
    Done(BulkJobResult),
    Aborted {
        stage: JobStage,
        reason: String,
        total: usize,
    },
}

pub async fn bulk_issue(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkIssueRequest>,
) -> impl IntoResponse {
    metrics::JOBS_STARTED_TOTAL.inc();

    match state
        .orchestrator()
        .run_bulk(&body.issuer_label, &body.requests)
        .await
    {
        Ok(result) => {
            metrics::JOBS_COMPLETED_TOTAL.inc();
            metrics::CERTIFICATES_ISSUED_TOTAL.inc_by(result.issuances.len() as u64);
            metrics::NOTIFICATIONS_SENT_TOTAL.inc_by(result.success_count as u64);
            metrics::NOTIFICATIONS_FAILED_TOTAL.inc_by(result.failure_count as u64);
            (StatusCode::OK, Json(BulkIssueResponse::Done(result)))
        }
        Err(aborted) => {
            let stage = aborted.stage.to_string();
            metrics::JOBS_ABORTED_TOTAL
                .with_label_values(&[stage.as_str()])
                .inc();
            let status = abort_status(&aborted);
            (
                status,
                Json(BulkIssueResponse::Aborted {
                    stage: aborted.stage,
                    reason: aborted.reason.to_string(),
                    total: aborted.total,
                }),
            )
        }
    }
}

fn abort_status(aborted: &JobAborted) -> StatusCode {
    if aborted.reason.is_validation() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certo_core::JobError;

    #[test]
    fn test_abort_status_mapping() {
        let validation = JobAborted {
            stage: JobStage::Generating,
            total: 101,
            reason: JobError::Validation("too many".to_string()),
        };
        assert_eq!(abort_status(&validation), StatusCode::BAD_REQUEST);

        let upstream = JobAborted {
            stage: JobStage::Committing,
            total: 5,
            reason: JobError::Commit(certo_core::LedgerError::Timeout),
        };
        assert_eq!(abort_status(&upstream), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_aborted_response_shape() {
        let response = BulkIssueResponse::Aborted {
            stage: JobStage::Uploading,
            reason: "upload failed: content store request timed out".to_string(),
            total: 3,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "aborted");
        assert_eq!(json["stage"], "uploading");
        assert_eq!(json["total"], 3);
    }
}
