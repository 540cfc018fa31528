//! HTTP wallet server.
//!
//! Serves the wallet API over PostgreSQL (or an in-memory store with
//! `--memory`), admitting every store call through a bounded gate.

use std::net::SocketAddr;

use anyhow::{Context, Error};
use pico_args::Arguments;
use wallet_core::{
    admission::AdmissionGate,
    db::Database,
    wallet::{MemoryWalletStore, PgWalletStore},
};
use wallet_server::{
    api,
    config::{Overrides, ServerConfig, StoreBackend},
    logging, metrics,
};

const HELP: &str = "\
Run the wallet HTTP server

USAGE:
  wallet_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or composed from POSTGRES_*]
  --capacity   N           Maximum concurrent store calls  [default: env ADMISSION_CAPACITY or 50]

FLAGS:
  --memory                 Use the in-memory store instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL             PostgreSQL connection string
  ADMISSION_CAPACITY       Admission gate capacity
  WALLET_QUERY_TIMEOUT_MS  Per-call store timeout
  REQUEST_TIMEOUT_SECS     Whole-request timeout
  METRICS_BIND             Prometheus exporter address
  (config.env and .env files are loaded if present)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load env files if they exist; already-set variables win.
    let _ = dotenvy::from_filename("config.env");
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        memory: pargs.contains("--memory"),
        bind: pargs
            .opt_value_from_str::<_, SocketAddr>("--bind")
            .context("Invalid --bind address")?,
        database_url: pargs
            .opt_value_from_str("--db-url")
            .context("Invalid --db-url")?,
        capacity: pargs
            .opt_value_from_str("--capacity")
            .context("Invalid --capacity")?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        anyhow::bail!("Unexpected arguments: {remaining:?}");
    }

    logging::init();

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(Error::msg)?;
        tracing::info!(%addr, "Prometheus exporter listening");
    }

    let gate = AdmissionGate::new(config.gate_capacity()?);
    let query_timeout = Some(config.query_timeout());

    let (state, database) = match config.store {
        StoreBackend::Postgres => {
            tracing::info!(url = %config.database.redacted_url(), "Connecting to database");
            let db = Database::new(&config.database)
                .await
                .context("Failed to connect to database")?;
            db.migrate().await.context("Failed to run migrations")?;
            tracing::info!("Database connected and migrated");

            let store = PgWalletStore::new(db.pool().clone());
            let state = api::AppState::gated(store, gate.clone(), query_timeout, "postgres");
            (state, Some(db))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory wallet store; balances are lost on exit");
            let state =
                api::AppState::gated(MemoryWalletStore::new(), gate.clone(), query_timeout, "memory");
            (state, None)
        }
    };

    let app = api::create_router(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    tracing::info!(
        bind = %config.bind,
        capacity = gate.capacity(),
        "Server is running. Press Ctrl+C to stop."
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Shutting down server...");
    gate.close();
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
