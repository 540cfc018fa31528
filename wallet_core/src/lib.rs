//! # Wallet Core
//!
//! Concurrency-safe wallet balances backed by PostgreSQL.
//!
//! A wallet is a caller-named account holding a non-negative, two-decimal
//! balance. Deposits and withdrawals are signed adjustments that the store
//! applies atomically: existence, the zero floor and rounding are all decided
//! inside one conditional write, never by reading a balance first.
//!
//! ## Core Modules
//!
//! - [`wallet`]: `WalletStore` trait, PostgreSQL and in-memory stores, errors
//! - [`admission`]: Bounded admission gate capping concurrent store calls
//! - [`db`]: Connection pool, configuration, migrations and timeouts
//!
//! ## Example
//!
//! ```
//! use std::num::NonZeroUsize;
//! use rust_decimal::Decimal;
//! use wallet_core::admission::{AdmissionGate, GatedWalletStore};
//! use wallet_core::wallet::{AdjustOutcome, MemoryWalletStore, WalletId, WalletStore};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), wallet_core::wallet::WalletError> {
//! let gate = AdmissionGate::new(NonZeroUsize::new(50).unwrap());
//! let store = GatedWalletStore::new(MemoryWalletStore::new(), gate);
//!
//! let id = WalletId::parse("w1")?;
//! store.create_wallet(&id).await?;
//! store.adjust_balance(&id, Decimal::new(1050, 2)).await?;
//!
//! let outcome = store.adjust_balance(&id, Decimal::new(-100, 0)).await?;
//! assert_eq!(outcome, AdjustOutcome::InsufficientFunds);
//! # Ok(())
//! # }
//! ```

/// Admission control for store calls.
pub mod admission;
pub use admission::{AdmissionGate, GatePermit, GatedWalletStore};

/// Database pool, configuration and timeouts.
pub mod db;

/// Wallet store, models and errors.
pub mod wallet;
pub use wallet::{AdjustOutcome, WalletError, WalletId, WalletResult, WalletStore};
