//! Wallet error types.

use rust_decimal::Decimal;
use std::time::Duration;
use thiserror::Error;

/// Wallet errors
///
/// Insufficient funds is deliberately absent: a withdrawal that would take the
/// balance below zero is reported as [`AdjustOutcome::InsufficientFunds`].
///
/// [`AdjustOutcome::InsufficientFunds`]: super::AdjustOutcome::InsufficientFunds
#[derive(Debug, Error)]
pub enum WalletError {
    /// Backend (connectivity or query) failure
    #[error("Database error: {0}")]
    Backend(#[from] sqlx::Error),

    /// Wallet not found
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// Wallet id is already taken
    #[error("Wallet already exists: {0}")]
    WalletAlreadyExists(String),

    /// Invalid amount (must be positive)
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Wallet id failed validation
    #[error("Invalid wallet id: {0}")]
    InvalidWalletId(String),

    /// Adjustment would exceed the largest storable balance
    #[error("Balance overflow")]
    BalanceOverflow,

    /// Store call did not finish in time
    #[error("Wallet operation timed out after {0:?}")]
    Timeout(Duration),

    /// Admission gate is closed
    #[error("Wallet store is unavailable")]
    Unavailable,
}

impl WalletError {
    /// Whether the caller caused this error (4xx-class) rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WalletError::WalletNotFound(_)
                | WalletError::WalletAlreadyExists(_)
                | WalletError::InvalidAmount(_)
                | WalletError::InvalidWalletId(_)
        )
    }

    /// Stable machine-readable code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            WalletError::Backend(_) => "backend_error",
            WalletError::WalletNotFound(_) => "wallet_not_found",
            WalletError::WalletAlreadyExists(_) => "wallet_already_exists",
            WalletError::InvalidAmount(_) => "invalid_amount",
            WalletError::InvalidWalletId(_) => "invalid_wallet_id",
            WalletError::BalanceOverflow => "balance_overflow",
            WalletError::Timeout(_) => "timeout",
            WalletError::Unavailable => "unavailable",
        }
    }

    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database errors are sanitized so that SQL details never reach clients.
    pub fn client_message(&self) -> String {
        match self {
            WalletError::Backend(_) => "Internal server error".to_string(),
            WalletError::Timeout(_) => "Wallet operation timed out".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for wallet operations
pub type WalletResult<T> = Result<T, WalletError>;
