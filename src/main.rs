use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use outreach_backend::api;
use outreach_backend::config::{Config, LogFormat, StoreBackend};
use outreach_backend::mail::{EmailTransport, LogTransport, ResendMailer};
use outreach_backend::models::builtin_catalog;
use outreach_backend::state::AppState;
use outreach_backend::store::{create_pool, MemoryStore, RedisStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (reads .env first)
    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize logging
    init_tracing(config.log_format);

    tracing::info!("Starting outreach backend...");
    tracing::info!(
        host = %config.server_host,
        port = %config.server_port,
        store = ?config.store_backend,
        resend_delay_seconds = config.resend_delay_seconds,
        "Configuration loaded"
    );

    let transport = build_transport(&config)?;

    match config.store_backend {
        StoreBackend::Redis => {
            let pool = create_pool(&config)?;
            let store = Arc::new(RedisStore::new(pool));

            // Test Redis connection
            match store.health_check().await {
                Ok(true) => tracing::info!("Redis connection established"),
                Ok(false) => tracing::warn!("Redis health check returned false"),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to connect to Redis");
                    // Continue anyway, might recover later
                }
            }

            run(config, store, transport).await
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, data is lost on restart");
            run(config, Arc::new(MemoryStore::new()), transport).await
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

fn build_transport(config: &Config) -> anyhow::Result<Arc<dyn EmailTransport>> {
    if config.resend_api_key.is_some() {
        return Ok(Arc::new(ResendMailer::from_config(config)?));
    }

    if config.mail_dry_run {
        tracing::warn!("RESEND_API_KEY not set, emails will only be logged");
        return Ok(Arc::new(LogTransport));
    }

    anyhow::bail!("RESEND_API_KEY is required (or set MAIL_DRY_RUN=true)")
}

async fn run<S>(
    config: Config,
    store: Arc<S>,
    transport: Arc<dyn EmailTransport>,
) -> anyhow::Result<()>
where
    S: Store + 'static,
{
    if config.seed_currencies {
        match store.seed_currencies(&builtin_catalog()).await {
            Ok(true) => tracing::info!("Seeded currencies catalog"),
            Ok(false) => tracing::info!("Currencies already exist, skipping seed"),
            Err(e) => tracing::error!(error = %e, "Error seeding currencies"),
        }
    }

    let addr: SocketAddr = config.server_addr().parse()?;

    // Create application state
    let state = AppState::build(config, store, transport);
    let outreach = Arc::clone(&state.outreach);

    // Build router
    let app = Router::new()
        .merge(api::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(address = %addr, "Server listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let dropped = outreach.scheduler().cancel_all();
    if dropped > 0 {
        tracing::warn!(dropped, "Pending resends dropped at shutdown");
    }

    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Handle shutdown signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        _ = terminate => {
            tracing::info!("Received terminate signal, shutting down...");
        },
    }
}
