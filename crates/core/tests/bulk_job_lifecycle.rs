//! Bulk job lifecycle integration tests.
//!
//! These tests drive the orchestrator with mock clients and verify:
//! - Order preservation across requests, uploads, issuances, notifications
//! - Fail-fast semantics in Generating/Uploading/Committing
//! - Best-effort semantics in Notifying
//! - Batch cap enforcement before any client call

use std::sync::Arc;

use certo_core::ledger::LedgerError;
use certo_core::notifier::DispatchConfig;
use certo_core::orchestrator::{BulkOrchestrator, JobStage, OrchestratorConfig};
use certo_core::renderer::RenderError;
use certo_core::testing::{fixtures, MockContentStore, MockLedger, MockMailTransport, MockRenderer};
use certo_core::IssuanceRequest;

/// Test helper wiring the orchestrator to mocks with fast dispatch delays.
struct TestHarness {
    orchestrator: BulkOrchestrator,
    renderer: MockRenderer,
    store: MockContentStore,
    ledger: MockLedger,
    transport: MockMailTransport,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(OrchestratorConfig {
            dispatch: DispatchConfig {
                batch_size: None,
                email_delay_ms: 1,
                batch_delay_ms: 2,
            },
            ..Default::default()
        })
    }

    fn with_config(config: OrchestratorConfig) -> Self {
        let renderer = MockRenderer::new();
        let store = MockContentStore::new();
        let ledger = MockLedger::new();
        let transport = MockMailTransport::new();

        let orchestrator = BulkOrchestrator::new(
            config,
            Arc::new(renderer.clone()),
            Arc::new(store.clone()),
            Arc::new(ledger.clone()),
            Arc::new(transport.clone()),
        );

        Self {
            orchestrator,
            renderer,
            store,
            ledger,
            transport,
        }
    }

    async fn run(&self, requests: &[IssuanceRequest]) -> Result<certo_core::BulkJobResult, certo_core::JobAborted> {
        self.orchestrator.run_bulk("Acme Institute", requests).await
    }
}

#[tokio::test]
async fn test_successful_job_preserves_order_across_all_arrays() {
    let harness = TestHarness::new();
    let requests = fixtures::batch(25);

    let result = harness.run(&requests).await.unwrap();

    assert_eq!(result.total, 25);
    assert_eq!(result.issuances.len(), 25);
    assert_eq!(result.notifications.len(), 25);
    assert_eq!(result.success_count, 25);
    assert_eq!(result.failure_count, 0);

    // One transaction for the whole batch.
    assert!(!result.transaction_ref.is_empty());
    assert!(result
        .issuances
        .iter()
        .all(|i| i.transaction_ref == result.transaction_ref));
    assert_eq!(harness.ledger.submission_count().await, 1);

    // Sequential IDs align positionally with the input.
    for (i, issuance) in result.issuances.iter().enumerate() {
        assert_eq!(issuance.sequential_id, 1 + i as u64);
    }

    // Notifications align with the input recipients.
    for (request, outcome) in requests.iter().zip(&result.notifications) {
        assert_eq!(outcome.recipient, request.recipient_email);
        assert!(outcome.success);
    }

    // The ledger saw names/registrations/hashes in input order.
    let submission = &harness.ledger.recorded_submissions().await[0];
    let names: Vec<_> = requests.iter().map(|r| r.subject_name.clone()).collect();
    let reg_nos: Vec<_> = requests.iter().map(|r| r.registration_id.clone()).collect();
    assert_eq!(submission.names, names);
    assert_eq!(submission.reg_nos, reg_nos);
    assert_eq!(submission.issuer_label, "Acme Institute");

    // Uploads happened sequentially in input order.
    let uploads = harness.store.recorded_uploads().await;
    assert_eq!(uploads.len(), 25);
    for (request, upload) in requests.iter().zip(&uploads) {
        assert!(upload.filename.contains(&request.registration_id));
    }
    let hashes: Vec<_> = uploads.iter().map(|u| u.content_hash.clone()).collect();
    assert_eq!(submission.content_hashes, hashes);
}

#[tokio::test]
async fn test_ledger_failure_aborts_before_any_notification() {
    // Fail-fast invariant across batch sizes: a commit failure leaves no
    // issuances and triggers zero send attempts.
    for size in [1usize, 2, 7, 50, 100] {
        let harness = TestHarness::new();
        harness
            .ledger
            .set_next_error(LedgerError::Reverted {
                reason: "registry paused".to_string(),
            })
            .await;

        let requests = fixtures::batch(size);
        let aborted = harness.run(&requests).await.unwrap_err();

        assert_eq!(aborted.stage, JobStage::Committing);
        assert_eq!(aborted.total, size);
        assert_eq!(harness.transport.attempt_count().await, 0);
        // Uploads happened before the commit and stay orphaned.
        assert_eq!(harness.store.upload_count().await, size);
    }
}

#[tokio::test]
async fn test_partial_notification_failure_still_completes() {
    let harness = TestHarness::new();

    let mut requests = vec![
        fixtures::issuance_request("alpha", "REG-1"),
        fixtures::issuance_request("bravo", "REG-2"),
        fixtures::request_without_email("charlie", "REG-3"),
        fixtures::issuance_request("delta", "REG-4"),
        fixtures::issuance_request("echo", "REG-5"),
    ];
    requests[4].recipient_email = Some("echo@example.com".to_string());
    harness
        .transport
        .set_failing_recipient("echo@example.com", "mailbox unavailable")
        .await;

    let result = harness.run(&requests).await.unwrap();

    assert_eq!(result.success_count, 3);
    assert_eq!(result.failure_count, 2);

    assert!(result.notifications[0].success);
    assert!(result.notifications[1].success);
    assert!(!result.notifications[2].success);
    assert_eq!(
        result.notifications[2].error_reason.as_deref(),
        Some("no recipient")
    );
    assert!(result.notifications[3].success);
    assert!(!result.notifications[4].success);
    assert!(result.notifications[4]
        .error_reason
        .as_deref()
        .unwrap()
        .contains("mailbox unavailable"));

    // Certificates were issued even though two emails failed.
    assert_eq!(result.issuances.len(), 5);
    assert_eq!(harness.ledger.submission_count().await, 1);
}

#[tokio::test]
async fn test_batch_cap_rejected_before_any_client_call() {
    let harness = TestHarness::new();
    let requests = fixtures::batch(101);

    let aborted = harness.run(&requests).await.unwrap_err();

    assert_eq!(aborted.stage, JobStage::Generating);
    assert!(aborted.reason.is_validation());
    assert_eq!(harness.renderer.render_count().await, 0);
    assert_eq!(harness.store.upload_count().await, 0);
    assert_eq!(harness.ledger.submission_count().await, 0);
    assert_eq!(harness.transport.attempt_count().await, 0);
}

#[tokio::test]
async fn test_empty_batch_rejected() {
    let harness = TestHarness::new();
    let aborted = harness.run(&[]).await.unwrap_err();
    assert_eq!(aborted.stage, JobStage::Generating);
    assert!(aborted.reason.is_validation());
}

#[tokio::test]
async fn test_render_failure_aborts_before_uploads() {
    let harness = TestHarness::new();
    harness
        .renderer
        .set_next_error(RenderError::TemplateFailed("font missing".to_string()))
        .await;

    let aborted = harness.run(&fixtures::batch(3)).await.unwrap_err();

    assert_eq!(aborted.stage, JobStage::Generating);
    assert_eq!(harness.store.upload_count().await, 0);
    assert_eq!(harness.ledger.submission_count().await, 0);
    assert_eq!(harness.transport.attempt_count().await, 0);
}

#[tokio::test]
async fn test_upload_failure_aborts_and_leaves_orphans() {
    let harness = TestHarness::new();
    harness.store.set_fail_at(2, "pinning backlog").await;

    let aborted = harness.run(&fixtures::batch(5)).await.unwrap_err();

    assert_eq!(aborted.stage, JobStage::Uploading);
    // The first two uploads went through and are not rolled back.
    assert_eq!(harness.store.upload_count().await, 2);
    assert_eq!(harness.ledger.submission_count().await, 0);
    assert_eq!(harness.transport.attempt_count().await, 0);
}

#[tokio::test]
async fn test_generation_compression_never_inflates_uploads() {
    // Mock artifacts over the size target are not parseable documents, so
    // the compressor's failure path must hand the exact bytes through to
    // the upload stage.
    let oversized = 300 * 1024;
    let harness = TestHarness::new();
    harness.renderer.set_artifact_size(oversized).await;

    let result = harness.run(&fixtures::batch(4)).await.unwrap();
    assert_eq!(result.total, 4);
    assert_eq!(harness.renderer.render_count().await, 4);

    let uploads = harness.store.recorded_uploads().await;
    assert_eq!(uploads.len(), 4);
    assert!(uploads.iter().all(|u| u.size_bytes == oversized));
}
