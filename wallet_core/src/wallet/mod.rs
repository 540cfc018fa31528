//! Wallet module providing balance storage with an atomic adjustment protocol.
//!
//! This module implements:
//! - The `WalletStore` trait (exists, read, create, adjust)
//! - A PostgreSQL store whose adjustment is one conditional update
//! - An in-memory store with the same atomicity guarantees
//! - Two-decimal quantization (`round2`) applied inside the atomic step
//!
//! ## Example
//!
//! ```no_run
//! use rust_decimal::Decimal;
//! use wallet_core::db::Database;
//! use wallet_core::wallet::{AdjustOutcome, PgWalletStore, WalletId, WalletStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(&Default::default()).await?;
//!     db.migrate().await?;
//!     let store = PgWalletStore::new(db.pool().clone());
//!
//!     let id = WalletId::parse("w1")?;
//!     store.create_wallet(&id).await?;
//!
//!     match store.adjust_balance(&id, Decimal::new(1050, 2)).await? {
//!         AdjustOutcome::Applied { balance } => println!("New balance: {balance}"),
//!         AdjustOutcome::InsufficientFunds => println!("Insufficient funds"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use errors::{WalletError, WalletResult};
pub use memory::MemoryWalletStore;
pub use models::{
    AdjustOutcome, BALANCE_SCALE, MAX_BALANCE, MAX_WALLET_ID_LEN, WalletId, format_balance,
    round2,
};
pub use postgres::PgWalletStore;
pub use store::WalletStore;
