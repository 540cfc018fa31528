//! PostgreSQL wallet store.
#![allow(clippy::needless_raw_string_hashes)]

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use sqlx::{PgPool, Row};

use super::{
    errors::{WalletError, WalletResult},
    models::{AdjustOutcome, WalletId},
    store::WalletStore,
};

/// SQLSTATE raised when `wallets_balance_non_negative` rejects a row.
const CHECK_VIOLATION: &str = "23514";

/// SQLSTATE raised when a value does not fit `NUMERIC(18, 2)`.
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

/// Existence, floor check, rounding and write in one statement. `found` comes
/// from the same snapshot as the update, so a missing row and a rejected
/// adjustment are told apart without a second round trip.
const ADJUST_BALANCE_SQL: &str = r#"
    WITH target AS (
        SELECT 1 FROM wallets WHERE id = $1
    ),
    updated AS (
        UPDATE wallets
           SET balance = ROUND(balance + $2, 2), updated_at = NOW()
         WHERE id = $1 AND ROUND(balance + $2, 2) >= 0
     RETURNING balance
    )
    SELECT EXISTS (SELECT 1 FROM target) AS found,
           (SELECT balance FROM updated) AS balance
"#;

/// Default PostgreSQL implementation of `WalletStore`
#[derive(Clone)]
pub struct PgWalletStore {
    pool: PgPool,
}

impl PgWalletStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WalletStore for PgWalletStore {
    async fn exists(&self, id: &WalletId) -> WalletResult<bool> {
        let row = sqlx::query("SELECT EXISTS (SELECT 1 FROM wallets WHERE id = $1) AS found")
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("found"))
    }

    async fn get_balance(&self, id: &WalletId) -> WalletResult<Decimal> {
        let row = sqlx::query("SELECT balance FROM wallets WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| WalletError::WalletNotFound(id.to_string()))?;

        Ok(row.get("balance"))
    }

    async fn create_wallet(&self, id: &WalletId) -> WalletResult<()> {
        // The conflict clause makes the uniqueness check part of the insert.
        let inserted = sqlx::query(
            "INSERT INTO wallets (id, balance)
             VALUES ($1, 0)
             ON CONFLICT (id) DO NOTHING
             RETURNING id",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(_) => {
                debug!("Created wallet {id}");
                Ok(())
            }
            None => Err(WalletError::WalletAlreadyExists(id.to_string())),
        }
    }

    async fn adjust_balance(&self, id: &WalletId, delta: Decimal) -> WalletResult<AdjustOutcome> {
        // Nothing is visible to other sessions until commit; dropping the
        // transaction (error, timeout, cancellation) rolls it back.
        let mut tx = self.pool.begin().await?;

        let row = match sqlx::query(ADJUST_BALANCE_SQL)
            .bind(id.as_str())
            .bind(delta)
            .fetch_one(&mut *tx)
            .await
        {
            Ok(row) => row,
            Err(err) => return classify_adjust_error(err, id),
        };

        let found: bool = row.get("found");
        let balance: Option<Decimal> = row.get("balance");

        let outcome = match (found, balance) {
            (_, Some(balance)) => AdjustOutcome::Applied { balance },
            (true, None) => AdjustOutcome::InsufficientFunds,
            (false, None) => return Err(WalletError::WalletNotFound(id.to_string())),
        };

        tx.commit().await?;

        debug!("Adjusted wallet {id} by {delta}: {outcome:?}");
        Ok(outcome)
    }

    async fn health_check(&self) -> WalletResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Map errors raised by the adjustment statement onto wallet outcomes.
fn classify_adjust_error(err: sqlx::Error, id: &WalletId) -> WalletResult<AdjustOutcome> {
    let code = match &err {
        sqlx::Error::Database(db_err) => db_err.code().map(|c| c.into_owned()),
        _ => None,
    };

    match code.as_deref() {
        // The constraint backstops the WHERE clause.
        Some(CHECK_VIOLATION) => Ok(AdjustOutcome::InsufficientFunds),
        Some(NUMERIC_VALUE_OUT_OF_RANGE) => {
            warn!("Adjustment of wallet {id} overflowed the balance column");
            Err(WalletError::BalanceOverflow)
        }
        _ => Err(WalletError::Backend(err)),
    }
}
