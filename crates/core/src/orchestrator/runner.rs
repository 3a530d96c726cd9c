//! The bulk issuance orchestrator.
//!
//! Drives a batch through `Generating -> Uploading -> Committing ->
//! Notifying -> Done` with a strict barrier between stages: no item enters
//! a stage before every item has finished the previous one. The first
//! three stages are fail-fast; Notifying is best-effort and always reaches
//! `Done` once entered.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::compressor::{compress, Artifact};
use crate::content_store::{ContentStore, UploadResult};
use crate::ledger::{Ledger, LedgerIssuance};
use crate::notifier::{MailTransport, NotificationDispatcher, NotificationItem};
use crate::renderer::{CertificateRenderer, IssuanceRequest};

use super::config::OrchestratorConfig;
use super::types::{BulkJobResult, JobAborted, JobError, JobStage};

/// Orchestrates one bulk issuance job at a time over injected clients.
///
/// The caller owns client lifecycles; the orchestrator only borrows them
/// for the duration of a job. Ledger submissions are serialized inside the
/// ledger client itself, so two orchestrators sharing a signer cannot race
/// the nonce.
pub struct BulkOrchestrator {
    config: OrchestratorConfig,
    renderer: Arc<dyn CertificateRenderer>,
    store: Arc<dyn ContentStore>,
    ledger: Arc<dyn Ledger>,
    dispatcher: NotificationDispatcher,
}

impl BulkOrchestrator {
    pub fn new(
        config: OrchestratorConfig,
        renderer: Arc<dyn CertificateRenderer>,
        store: Arc<dyn ContentStore>,
        ledger: Arc<dyn Ledger>,
        transport: Arc<dyn MailTransport>,
    ) -> Self {
        let dispatcher = NotificationDispatcher::new(transport, config.dispatch.clone());
        Self {
            config,
            renderer,
            store,
            ledger,
            dispatcher,
        }
    }

    /// Run one bulk job to completion.
    ///
    /// `Ok` means the batch was committed to the ledger in one transaction;
    /// notification failures are reported inside the result, not as errors.
    /// `Err` means the job aborted and nothing was issued.
    pub async fn run_bulk(
        &self,
        issuer_label: &str,
        requests: &[IssuanceRequest],
    ) -> Result<BulkJobResult, JobAborted> {
        let job_id = Uuid::new_v4();
        let total = requests.len();
        info!(%job_id, total, issuer_label, "bulk issuance job accepted");

        if let Err(reason) = self.check_batch(requests) {
            return Err(abort(job_id, JobStage::Generating, total, reason));
        }

        // Generating: render + compress every item before anything uploads.
        let artifacts = match self.generate_all(requests).await {
            Ok(artifacts) => artifacts,
            Err(reason) => return Err(abort(job_id, JobStage::Generating, total, reason)),
        };
        info!(%job_id, total, "all artifacts generated");

        // Uploading: sequential, input order, fail-fast. Earlier uploads
        // are not rolled back; storage orphans are accepted.
        let uploads = match self.upload_all(requests, &artifacts).await {
            Ok(uploads) => uploads,
            Err((done, reason)) => {
                warn!(
                    %job_id,
                    uploaded = done,
                    "aborting after partial upload; stored artifacts remain orphaned"
                );
                return Err(abort(job_id, JobStage::Uploading, total, reason));
            }
        };
        drop(artifacts);
        info!(%job_id, total, "all artifacts uploaded");

        // Committing: exactly one ledger transaction for the whole batch.
        let issuances = match self.commit_all(issuer_label, requests, &uploads).await {
            Ok(issuances) => issuances,
            Err(reason) => return Err(abort(job_id, JobStage::Committing, total, reason)),
        };
        let transaction_ref = issuances
            .first()
            .map(|i| i.transaction_ref.clone())
            .unwrap_or_default();
        info!(%job_id, %transaction_ref, "batch committed to ledger");

        // Notifying: best-effort, cannot abort the job.
        let items = build_notifications(issuer_label, requests, &issuances, &uploads);
        let summary = self.dispatcher.dispatch(&items).await;
        info!(
            %job_id,
            delivered = summary.success_count,
            failed = summary.failure_count,
            "notification dispatch complete"
        );

        Ok(BulkJobResult {
            total,
            issuances,
            notifications: summary.outcomes,
            success_count: summary.success_count,
            failure_count: summary.failure_count,
            transaction_ref,
        })
    }

    fn check_batch(&self, requests: &[IssuanceRequest]) -> Result<(), JobError> {
        if requests.is_empty() {
            return Err(JobError::Validation("batch is empty".to_string()));
        }
        if requests.len() > self.config.max_batch_items {
            return Err(JobError::Validation(format!(
                "batch of {} exceeds the {}-record cap",
                requests.len(),
                self.config.max_batch_items
            )));
        }
        Ok(())
    }

    async fn generate_all(
        &self,
        requests: &[IssuanceRequest],
    ) -> Result<Vec<Artifact>, JobError> {
        let mut artifacts = Vec::with_capacity(requests.len());
        for request in requests {
            let rendered = self.renderer.render(request).await?;
            artifacts.push(compress(rendered, &self.config.compressor));
        }
        Ok(artifacts)
    }

    async fn upload_all(
        &self,
        requests: &[IssuanceRequest],
        artifacts: &[Artifact],
    ) -> Result<Vec<UploadResult>, (usize, JobError)> {
        let mut uploads = Vec::with_capacity(artifacts.len());
        for (request, artifact) in requests.iter().zip(artifacts) {
            let filename = format!(
                "certificate-{}.{}",
                request.registration_id,
                artifact.mime.extension()
            );
            match self
                .store
                .upload(&artifact.bytes, &filename, artifact.mime)
                .await
            {
                Ok(upload) => uploads.push(upload),
                Err(e) => return Err((uploads.len(), e.into())),
            }
        }
        Ok(uploads)
    }

    async fn commit_all(
        &self,
        issuer_label: &str,
        requests: &[IssuanceRequest],
        uploads: &[UploadResult],
    ) -> Result<Vec<LedgerIssuance>, JobError> {
        let names: Vec<String> = requests.iter().map(|r| r.subject_name.clone()).collect();
        let reg_nos: Vec<String> = requests
            .iter()
            .map(|r| r.registration_id.clone())
            .collect();
        let hashes: Vec<String> = uploads.iter().map(|u| u.content_hash.clone()).collect();

        let issuances = self
            .ledger
            .bulk_issue(&names, &reg_nos, &hashes, issuer_label)
            .await?;
        Ok(issuances)
    }
}

fn abort(job_id: Uuid, stage: JobStage, total: usize, reason: JobError) -> JobAborted {
    tracing::error!(%job_id, %stage, total, "job aborted: {}", reason);
    JobAborted {
        stage,
        total,
        reason,
    }
}

/// One notification per request, index-aligned, linking the stored
/// artifact and the ledger record. Artifacts themselves were dropped after
/// upload; the email carries the gateway link instead of an attachment.
fn build_notifications(
    issuer_label: &str,
    requests: &[IssuanceRequest],
    issuances: &[LedgerIssuance],
    uploads: &[UploadResult],
) -> Vec<NotificationItem> {
    requests
        .iter()
        .zip(issuances)
        .zip(uploads)
        .map(|((request, issuance), upload)| NotificationItem {
            recipient: request.recipient_email.clone(),
            subject: format!("Your certificate from {}", issuer_label),
            html_body: notification_body(request, issuance, upload, issuer_label),
            attachments: Vec::new(),
        })
        .collect()
}

fn notification_body(
    request: &IssuanceRequest,
    issuance: &LedgerIssuance,
    upload: &UploadResult,
    issuer_label: &str,
) -> String {
    format!(
        "<html><body>\
         <p>Hello {name},</p>\
         <p>{issuer} has issued certificate no. {id} to you \
         (registration {reg}).</p>\
         <p><a href=\"{url}\">View your certificate</a></p>\
         <p>Ledger transaction: <code>{tx}</code></p>\
         </body></html>",
        name = request.subject_name,
        issuer = issuer_label,
        id = issuance.sequential_id,
        reg = request.registration_id,
        url = upload.gateway_url,
        tx = issuance.transaction_ref,
    )
}
