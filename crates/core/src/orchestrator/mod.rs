//! Bulk issuance orchestration.
//!
//! Sequences rendering, compression, upload, the single ledger commit and
//! notification dispatch over an ordered batch, with fail-fast semantics
//! on the irreversible early stages and best-effort semantics on the
//! final one.

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::BulkOrchestrator;
pub use types::{BulkJobResult, JobAborted, JobError, JobStage};
