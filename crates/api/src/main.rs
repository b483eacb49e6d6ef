use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::router::build_app_router;
use stockroom_api::state::AppState;
use stockroom_ledger::{Ledger, LedgerConfig, LedgerContext};

const DEFAULT_LOG_FILTER: &str = "stockroom_api=debug,stockroom_ledger=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    init_tracing(config.log_format);
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let ledger_config = LedgerConfig::from_env().expect("Invalid ledger configuration");
    tracing::info!(
        op_timeout_ms = ledger_config.op_timeout.as_millis() as u64,
        pad_width = ledger_config.pad_width,
        genres = ledger_config.genre_prefixes.len(),
        "Loaded ledger configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = stockroom_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    stockroom_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    stockroom_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- App state & router ---
    let ledger = Ledger::new(LedgerContext::new(pool.clone(), ledger_config));
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        ledger,
    };
    let app = build_app_router(state, &config);

    // --- Server ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST:PORT combination");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    tracing::info!(%addr, "Server listening");

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    // In-flight requests get `shutdown_timeout_secs` to drain once a signal
    // arrives.
    let drain_limit = Duration::from_secs(config.shutdown_timeout_secs);
    let drain_deadline = async move {
        let _ = stop_rx.wait_for(|stopped| *stopped).await;
        tokio::time::sleep(drain_limit).await;
    };

    tokio::select! {
        result = server => {
            result.expect("Server error");
            tracing::info!("All connections drained");
        }
        () = drain_deadline => {
            tracing::warn!(
                timeout_secs = config.shutdown_timeout_secs,
                "Shutdown timeout elapsed, dropping remaining connections"
            );
        }
    }

    pool.close().await;
    tracing::info!("Database pool closed, shutdown complete");
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
