//! Wallet store trait.
//!
//! Every implementation must evaluate existence, the balance floor and the
//! two-decimal rounding inside a single atomic step of the backend. Callers
//! never read a balance to decide whether to write one.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;

use super::{
    errors::WalletResult,
    models::{AdjustOutcome, WalletId},
};

/// Trait for wallet persistence
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Check whether a wallet exists
    async fn exists(&self, id: &WalletId) -> WalletResult<bool>;

    /// Get the current balance
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet with this id
    async fn get_balance(&self, id: &WalletId) -> WalletResult<Decimal>;

    /// Create a wallet with a zero balance
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletAlreadyExists` - The id is taken, including when
    ///   a concurrent create won the race
    async fn create_wallet(&self, id: &WalletId) -> WalletResult<()>;

    /// Atomically apply `balance := round2(balance + delta)` if the result is
    /// not negative
    ///
    /// # Returns
    ///
    /// * `AdjustOutcome::Applied` - New balance after the adjustment
    /// * `AdjustOutcome::InsufficientFunds` - Balance left untouched
    ///
    /// # Errors
    ///
    /// * `WalletError::WalletNotFound` - No wallet with this id
    /// * `WalletError::BalanceOverflow` - Result exceeds the storable maximum
    async fn adjust_balance(&self, id: &WalletId, delta: Decimal) -> WalletResult<AdjustOutcome>;

    /// Check that the backend is reachable
    async fn health_check(&self) -> WalletResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<S: WalletStore + ?Sized> WalletStore for Arc<S> {
    async fn exists(&self, id: &WalletId) -> WalletResult<bool> {
        (**self).exists(id).await
    }

    async fn get_balance(&self, id: &WalletId) -> WalletResult<Decimal> {
        (**self).get_balance(id).await
    }

    async fn create_wallet(&self, id: &WalletId) -> WalletResult<()> {
        (**self).create_wallet(id).await
    }

    async fn adjust_balance(&self, id: &WalletId, delta: Decimal) -> WalletResult<AdjustOutcome> {
        (**self).adjust_balance(id, delta).await
    }

    async fn health_check(&self) -> WalletResult<()> {
        (**self).health_check().await
    }
}
