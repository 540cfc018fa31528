//! Structured logging configuration.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info,sqlx=warn,hyper=warn";

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var. Records emitted
/// through the `log` facade (the wallet core library) are bridged into the
/// same subscriber.
///
/// # Example
///
/// ```no_run
/// use wallet_server::logging;
///
/// #[tokio::main]
/// async fn main() {
///     logging::init();
///     tracing::info!("Server starting");
/// }
/// ```
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log a completed HTTP request
///
/// Requests slower than one second are logged as warnings.
pub fn log_api_request(request_id: &str, method: &str, path: &str, status: u16, duration_ms: u64) {
    if duration_ms > 1000 {
        tracing::warn!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status,
            duration_ms = duration_ms,
            "Slow request"
        );
    } else {
        tracing::info!(
            request_id = request_id,
            http_method = method,
            http_path = path,
            http_status = status,
            duration_ms = duration_ms,
            "Request completed"
        );
    }
}

/// Log a wallet operation outcome
pub fn log_wallet_operation(operation: &str, wallet_id: &str, outcome: &str) {
    tracing::debug!(
        operation = operation,
        wallet_id = wallet_id,
        outcome = outcome,
        "Wallet operation"
    );
}
