//! In-process wallet store.
//!
//! Holds the same guarantees as the PostgreSQL store: each operation runs as a
//! single critical section, so the floor check, rounding and write of an
//! adjustment cannot interleave with another writer.

use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use tokio::sync::RwLock;

use super::{
    errors::{WalletError, WalletResult},
    models::{AdjustOutcome, MAX_BALANCE, WalletId, round2},
    store::WalletStore,
};

/// Wallet store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct MemoryWalletStore {
    wallets: RwLock<HashMap<WalletId, Decimal>>,
}

impl MemoryWalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of wallets held
    pub async fn len(&self) -> usize {
        self.wallets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.wallets.read().await.is_empty()
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn exists(&self, id: &WalletId) -> WalletResult<bool> {
        Ok(self.wallets.read().await.contains_key(id))
    }

    async fn get_balance(&self, id: &WalletId) -> WalletResult<Decimal> {
        self.wallets
            .read()
            .await
            .get(id)
            .copied()
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))
    }

    async fn create_wallet(&self, id: &WalletId) -> WalletResult<()> {
        match self.wallets.write().await.entry(id.clone()) {
            Entry::Occupied(_) => Err(WalletError::WalletAlreadyExists(id.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(Decimal::ZERO);
                Ok(())
            }
        }
    }

    async fn adjust_balance(&self, id: &WalletId, delta: Decimal) -> WalletResult<AdjustOutcome> {
        let mut wallets = self.wallets.write().await;
        let balance = wallets
            .get_mut(id)
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))?;

        let next = rounded_sum(*balance, delta).ok_or(WalletError::BalanceOverflow)?;

        if next < Decimal::ZERO {
            return Ok(AdjustOutcome::InsufficientFunds);
        }
        // round2 can yield -0.00; keep the sign off stored balances.
        let next = if next.is_zero() { Decimal::ZERO } else { next };
        if next > MAX_BALANCE {
            warn!("Adjustment of wallet {id} overflowed the balance ceiling");
            return Err(WalletError::BalanceOverflow);
        }

        *balance = next;
        Ok(AdjustOutcome::Applied { balance: next })
    }
}

/// `round2(balance + delta)` computed as if the sum were exact.
///
/// `Decimal` holds 28 significant digits, so a long-tailed `delta` added to a
/// large balance is rounded once by the addition and again by `round2`. When
/// the addition loses digits, round the delta first instead. A half-cent tie
/// never reaches that branch: a tie has at most three fractional digits, and
/// the only case where its rounding direction differs from the sum's needs
/// `|delta| < balance`, which always fits.
fn rounded_sum(balance: Decimal, delta: Decimal) -> Option<Decimal> {
    let sum = balance.checked_add(delta)?;
    if sum - balance == delta {
        return Some(round2(sum));
    }
    balance.checked_add(round2(delta))
}
