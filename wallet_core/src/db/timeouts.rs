//! Store call timeout helpers
//!
//! Bounds how long a wallet operation may hold an admission slot and a pooled
//! connection. A future that times out is dropped, which rolls back any open
//! transaction it owned.

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::wallet::{WalletError, WalletResult};

/// Default timeout for a single store call (5 seconds)
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Execute a store call with timeout
///
/// # Arguments
///
/// * `duration` - Timeout duration
/// * `future` - Async operation to execute
///
/// # Returns
///
/// * `WalletResult<T>` - The operation's own result, or
///   `WalletError::Timeout` if it did not finish in time
///
/// # Example
///
/// ```no_run
/// use wallet_core::db::timeouts::{with_timeout, DEFAULT_QUERY_TIMEOUT};
/// use wallet_core::wallet::{WalletId, WalletStore};
/// # async fn example(store: &dyn WalletStore) -> Result<(), Box<dyn std::error::Error>> {
///
/// let id = WalletId::parse("w1")?;
/// let balance = with_timeout(DEFAULT_QUERY_TIMEOUT, store.get_balance(&id)).await?;
///
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T>(duration: Duration, future: F) -> WalletResult<T>
where
    F: Future<Output = WalletResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("Wallet operation timed out after {duration:?}");
            Err(WalletError::Timeout(duration))
        }
    }
}

/// Execute a store call with the default timeout (5 seconds)
pub async fn with_default_timeout<F, T>(future: F) -> WalletResult<T>
where
    F: Future<Output = WalletResult<T>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, future).await
}
