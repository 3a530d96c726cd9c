mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use certo_core::{
    load_config, validate_config, BulkOrchestrator, CertificateRenderer, ContentStore,
    HttpContentStore, HttpMailer, Ledger, LedgerClient, MailTransport, PdfCertificateRenderer,
};

use api::create_router;
use state::{AppState, ClientNames};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("certo {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("CERTO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Construct the injected clients. Their lifecycles are owned here, not
    // by the orchestrator; the ledger client also owns the nonce sequence
    // that serializes submissions for the signing identity.
    let renderer: Arc<dyn CertificateRenderer> =
        Arc::new(PdfCertificateRenderer::new(config.renderer.clone()));
    info!("Renderer initialized: {}", renderer.name());

    let store: Arc<dyn ContentStore> = Arc::new(
        HttpContentStore::new(config.storage.clone())
            .context("Failed to create content store client")?,
    );
    info!("Content store initialized: {}", store.name());

    let ledger_client =
        LedgerClient::new(config.ledger.clone()).context("Failed to create ledger client")?;
    info!(
        "Ledger client initialized, issuer address {}",
        ledger_client.issuer_address()
    );
    let ledger: Arc<dyn Ledger> = Arc::new(ledger_client);

    let transport: Arc<dyn MailTransport> = Arc::new(
        HttpMailer::new(config.mailer.clone()).context("Failed to create mail transport")?,
    );

    // Verify the mail transport once at startup. Failure is logged only:
    // a flaky provider must not block issuance.
    match transport.verify().await {
        Ok(()) => info!("Mail transport verified: {}", transport.name()),
        Err(e) => warn!("Mail transport verification failed (continuing): {}", e),
    }

    let client_names = ClientNames {
        renderer: renderer.name().to_string(),
        content_store: store.name().to_string(),
        mail_transport: transport.name().to_string(),
    };

    // Create the orchestrator
    let orchestrator = Arc::new(BulkOrchestrator::new(
        config.pipeline.clone(),
        renderer,
        store,
        ledger,
        transport,
    ));
    info!("Bulk orchestrator initialized");

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), orchestrator, client_names));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
