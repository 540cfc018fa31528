//! Wallet store decorator that routes every call through an admission gate.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::time::Duration;

use super::gate::AdmissionGate;
use crate::db::timeouts::DEFAULT_QUERY_TIMEOUT;
use crate::wallet::{AdjustOutcome, WalletId, WalletResult, WalletStore};

/// `WalletStore` whose calls each hold one admission slot
pub struct GatedWalletStore<S> {
    inner: S,
    gate: AdmissionGate,
    operation_timeout: Option<Duration>,
}

impl<S: WalletStore> GatedWalletStore<S> {
    /// Wrap `inner`, bounding each call by [`DEFAULT_QUERY_TIMEOUT`]
    pub fn new(inner: S, gate: AdmissionGate) -> Self {
        Self {
            inner,
            gate,
            operation_timeout: Some(DEFAULT_QUERY_TIMEOUT),
        }
    }

    /// Replace the per-call timeout; `None` lets calls run unbounded
    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout = timeout;
        self
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: WalletStore> WalletStore for GatedWalletStore<S> {
    async fn exists(&self, id: &WalletId) -> WalletResult<bool> {
        self.gate
            .run(self.operation_timeout, self.inner.exists(id))
            .await
    }

    async fn get_balance(&self, id: &WalletId) -> WalletResult<Decimal> {
        self.gate
            .run(self.operation_timeout, self.inner.get_balance(id))
            .await
    }

    async fn create_wallet(&self, id: &WalletId) -> WalletResult<()> {
        self.gate
            .run(self.operation_timeout, self.inner.create_wallet(id))
            .await
    }

    async fn adjust_balance(&self, id: &WalletId, delta: Decimal) -> WalletResult<AdjustOutcome> {
        self.gate
            .run(self.operation_timeout, self.inner.adjust_balance(id, delta))
            .await
    }

    async fn health_check(&self) -> WalletResult<()> {
        self.gate
            .run(self.operation_timeout, self.inner.health_check())
            .await
    }
}
