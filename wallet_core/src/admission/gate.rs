//! Bounded admission gate.

use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore, TryAcquireError};

use crate::db::timeouts::with_timeout;
use crate::wallet::{WalletError, WalletResult};

/// Gauge tracking slots held across every gate in the process.
pub const IN_FLIGHT_GAUGE: &str = "admission_slots_in_flight";

/// Counting semaphore capping concurrent store calls.
///
/// Slots are granted in FIFO order. Cloning the gate shares the same slots.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One reserved slot; the slot is returned when the permit is dropped.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl GatePermit {
    fn new(permit: OwnedSemaphorePermit) -> Self {
        metrics::gauge!(IN_FLIGHT_GAUGE).increment(1.0);
        Self { _permit: permit }
    }
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        metrics::gauge!(IN_FLIGHT_GAUGE).decrement(1.0);
    }
}

impl AdmissionGate {
    /// Create a gate with `capacity` slots
    pub fn new(capacity: NonZeroUsize) -> Self {
        let capacity = capacity.get();
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot and reserve it
    ///
    /// There is no timeout on the wait; bound it upstream if needed.
    ///
    /// # Errors
    ///
    /// * `WalletError::Unavailable` - The gate was closed
    pub async fn acquire(&self) -> WalletResult<GatePermit> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| WalletError::Unavailable)?;

        Ok(GatePermit::new(permit))
    }

    /// Reserve a slot only if one is free right now
    pub fn try_acquire(&self) -> WalletResult<Option<GatePermit>> {
        match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => Ok(Some(GatePermit::new(permit))),
            Err(TryAcquireError::NoPermits) => Ok(None),
            Err(TryAcquireError::Closed) => Err(WalletError::Unavailable),
        }
    }

    /// Run `operation` while holding one slot
    ///
    /// The slot is released on every exit path, including when the caller
    /// drops the returned future. With `limit` set, the operation (not the
    /// wait for a slot) is bounded and fails with `WalletError::Timeout`.
    pub async fn run<F, T>(&self, limit: Option<Duration>, operation: F) -> WalletResult<T>
    where
        F: Future<Output = WalletResult<T>>,
    {
        let _permit = self.acquire().await?;

        match limit {
            Some(duration) => with_timeout(duration, operation).await,
            None => operation.await,
        }
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots held right now
    pub fn in_flight(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Refuse all pending and future acquisitions
    ///
    /// Permits already granted stay valid until dropped.
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn is_closed(&self) -> bool {
        self.semaphore.is_closed()
    }
}
