//! Core library for certo, the bulk certificate issuance pipeline.
//!
//! Each batch of up to 100 records is rendered, size-normalized, uploaded
//! to content-addressable storage, committed to the certificate registry
//! in exactly one signed transaction, and finally announced to recipients
//! through a rate-limited mail dispatcher.

pub mod compressor;
pub mod config;
pub mod content_store;
pub mod ledger;
pub mod notifier;
pub mod orchestrator;
pub mod renderer;
pub mod testing;

pub use compressor::{compress, Artifact, ArtifactMime, CompressorConfig};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    ServerConfig,
};
pub use content_store::{ContentStore, HttpContentStore, StoreConfig, StoreError, UploadResult};
pub use ledger::{
    IssuerSigner, Ledger, LedgerClient, LedgerConfig, LedgerError, LedgerIssuance,
};
pub use notifier::{
    BulkNotificationSummary, DispatchConfig, HttpMailer, MailError, MailTransport, MailerConfig,
    NotificationDispatcher, NotificationOutcome,
};
pub use orchestrator::{
    BulkJobResult, BulkOrchestrator, JobAborted, JobError, JobStage, OrchestratorConfig,
};
pub use renderer::{
    CertificateRenderer, IssuanceRequest, PdfCertificateRenderer, RenderError, RendererConfig,
};
