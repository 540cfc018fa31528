//! Wallet API handlers.
//!
//! Create a wallet:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/wallets/wallet/create \
//!   -H "Content-Type: application/json" \
//!   -d '{"walletId": "w1"}'
//! ```
//!
//! Deposit into it:
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/wallets/wallet \
//!   -H "Content-Type: application/json" \
//!   -d '{"walletId": "w1", "operationType": "DEPOSIT", "amount": 10.50}'
//! ```

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use wallet_core::wallet::{AdjustOutcome, WalletError, WalletId, format_balance};

use super::{AppState, request_id::RequestId};
use crate::{logging, metrics};

pub const WALLET_CREATED: &str = "Wallet created\n";
pub const OPERATION_COMPLETE: &str = "Operation complete\n";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    pub wallet_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRequest {
    pub wallet_id: String,
    pub operation_type: OperationType,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OperationType {
    #[serde(rename = "DEPOSIT")]
    Deposit,
    #[serde(rename = "WITHDRAW")]
    Withdraw,
}

impl OperationType {
    /// Signed delta applied to the balance
    pub fn delta(self, amount: Decimal) -> Decimal {
        match self {
            OperationType::Deposit => amount,
            OperationType::Withdraw => -amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Error returned by the wallet handlers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    fn insufficient_funds(id: &WalletId) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "insufficient_funds",
            format!("Insufficient funds in wallet {id}"),
        )
    }

    /// Map a store error for a read, where an unknown wallet is a missing resource
    fn on_read(err: WalletError) -> Self {
        match err {
            WalletError::WalletNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, err.code(), err.client_message())
            }
            other => Self::from(other),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            match &err {
                WalletError::Timeout(_) | WalletError::Unavailable => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %err, code = err.code(), "Wallet operation failed");
        }

        Self::new(status, err.code(), err.client_message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            rejection.body_text(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
            code: self.code.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Record the outcome of a store call
fn observe(operation: &'static str, wallet_id: &WalletId, outcome: &'static str) {
    metrics::wallet_operations_total(operation, outcome);
    logging::log_wallet_operation(operation, wallet_id.as_str(), outcome);
}

fn outcome_of<T>(result: &Result<T, WalletError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.code(),
    }
}

/// Get the balance of a wallet.
///
/// # Response
///
/// `200 OK` with the balance as text, two decimals and a trailing newline.
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<String, ApiError> {
    let id = WalletId::parse(wallet_id)?;

    let result = state.store.get_balance(&id).await;
    observe("get_balance", &id, outcome_of(&result));

    let balance = result.map_err(ApiError::on_read)?;
    Ok(format!("{}\n", format_balance(balance)))
}

/// Create a wallet with a zero balance.
///
/// # Request Body
///
/// ```json
/// { "walletId": "w1" }
/// ```
pub async fn create_wallet(
    State(state): State<AppState>,
    payload: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(payload) = payload?;
    let id = WalletId::parse(payload.wallet_id)?;

    let result = state.store.create_wallet(&id).await;
    observe("create_wallet", &id, outcome_of(&result));
    result?;

    Ok(WALLET_CREATED)
}

/// Deposit into or withdraw from a wallet.
///
/// # Request Body
///
/// ```json
/// { "walletId": "w1", "operationType": "WITHDRAW", "amount": 5.25 }
/// ```
///
/// # Errors
///
/// * `400 invalid_amount` - Amount is zero or negative
/// * `400 wallet_not_found` - Unknown wallet
/// * `400 insufficient_funds` - Withdrawal exceeds the balance
pub async fn wallet_operation(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<OperationRequest>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(payload) = payload?;
    let id = WalletId::parse(payload.wallet_id)?;

    if payload.amount <= Decimal::ZERO {
        return Err(WalletError::InvalidAmount(payload.amount).into());
    }

    let delta = payload.operation_type.delta(payload.amount);
    let result = state.store.adjust_balance(&id, delta).await;

    match result {
        Ok(AdjustOutcome::Applied { balance }) => {
            observe("adjust_balance", &id, "applied");
            tracing::debug!(
                request_id = request_id.as_str(),
                wallet_id = %id,
                operation = ?payload.operation_type,
                %balance,
                "Balance adjusted"
            );
            Ok(OPERATION_COMPLETE)
        }
        Ok(AdjustOutcome::InsufficientFunds) => {
            observe("adjust_balance", &id, "insufficient_funds");
            Err(ApiError::insufficient_funds(&id))
        }
        Err(e) => {
            observe("adjust_balance", &id, e.code());
            Err(e.into())
        }
    }
}
