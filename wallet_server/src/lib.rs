//! HTTP wallet service.
//!
//! Exposes the wallet store over a small JSON/text API. Every store call is
//! admitted through a bounded gate, so the number of concurrent database
//! operations never exceeds the configured capacity regardless of how many
//! requests are in flight.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
