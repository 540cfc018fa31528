//! HTTP API for the wallet service.
//!
//! # Modules
//!
//! - [`wallets`]: Balance reads, wallet creation, deposits and withdrawals
//! - [`request_id`]: Request correlation, timing and HTTP metrics
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Health status (JSON)
//! GET  /api/v1/wallets/{id}             - Balance as text, e.g. "10.50\n"
//! POST /api/v1/wallets/wallet/create    - {"walletId"}
//! POST /api/v1/wallets/wallet           - {"walletId","operationType","amount"}
//! ```
//!
//! Errors are JSON `{"error": "...", "code": "..."}`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use std::num::NonZeroUsize;
//! use std::time::Duration;
//! use wallet_core::admission::AdmissionGate;
//! use wallet_core::wallet::MemoryWalletStore;
//! use wallet_server::api::{AppState, create_router};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gate = AdmissionGate::new(NonZeroUsize::new(50).unwrap());
//! let state = AppState::gated(MemoryWalletStore::new(), gate, Some(Duration::from_secs(5)), "memory");
//!
//! let app = create_router(state, Duration::from_secs(5));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # CORS
//!
//! CORS is configured permissively. In production, configure appropriate
//! origins, methods, and headers.

pub mod request_id;
pub mod wallets;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};
use wallet_core::admission::{AdmissionGate, GatedWalletStore};
use wallet_core::wallet::WalletStore;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request (cheap due to Arc wrappers).
#[derive(Clone)]
pub struct AppState {
    /// Store used by the handlers; every call is admitted through `gate`
    pub store: Arc<dyn WalletStore>,
    /// Admission gate shared with `store`, kept for health and metrics
    pub gate: AdmissionGate,
    /// Backend name reported by `/health`
    pub backend: &'static str,
}

impl AppState {
    /// Wrap `inner` in a [`GatedWalletStore`] sharing `gate`
    pub fn gated<S>(
        inner: S,
        gate: AdmissionGate,
        operation_timeout: Option<Duration>,
        backend: &'static str,
    ) -> Self
    where
        S: WalletStore + 'static,
    {
        let store = GatedWalletStore::new(inner, gate.clone()).with_operation_timeout(operation_timeout);
        Self {
            store: Arc::new(store),
            gate,
            backend,
        }
    }
}

/// Create the complete API router with all endpoints and middleware.
///
/// `request_timeout` bounds each request end to end; a request that exceeds
/// it is answered with `408 Request Timeout` and its in-flight store call is
/// dropped, releasing its admission slot.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let v1_routes = Router::new()
        .route("/wallets/{wallet_id}", get(wallets::get_balance))
        .route("/wallets/wallet/create", post(wallets::create_wallet))
        .route("/wallets/wallet", post(wallets::wallet_operation));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id::request_id_middleware))
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::REQUEST_TIMEOUT,
                    request_timeout,
                )),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancers.
///
/// The store check goes through the admission gate like any other call.
/// Returns `200 OK` when the store answers, `503 Service Unavailable` otherwise.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","version":"0.1.0","store":"postgres","admission":{"capacity":50,"in_flight":0},"timestamp":"..."}
/// ```
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let store_healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            false
        }
    };

    let status_code = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = json!({
        "status": if store_healthy { "healthy" } else { "unhealthy" },
        "version": env!("CARGO_PKG_VERSION"),
        "store": state.backend,
        "admission": {
            "capacity": state.gate.capacity(),
            "in_flight": state.gate.in_flight(),
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (status_code, Json(response))
}
