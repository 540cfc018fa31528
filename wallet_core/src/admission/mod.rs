//! Admission control for store calls.
//!
//! The [`AdmissionGate`] caps how many wallet operations run against the
//! backing store at once, independent of how many requests are in flight.
//! [`GatedWalletStore`] applies the gate to every method of a `WalletStore`.

pub mod gate;
pub mod guarded;

pub use gate::{AdmissionGate, GatePermit};
pub use guarded::GatedWalletStore;
