//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::time::Duration;
use wallet_core::db::DatabaseConfig;

/// Default HTTP bind address
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Admission gate and timeout configuration
    pub admission: AdmissionConfig,
    /// Which wallet store backs the server
    pub store: StoreBackend,
    /// Prometheus exporter address, if metrics are enabled
    pub metrics_bind: Option<SocketAddr>,
}

/// Concurrency limits and deadlines for store calls
#[derive(Debug, Clone)]
pub struct AdmissionConfig {
    /// Maximum concurrent store calls
    pub capacity: usize,
    /// Per-call timeout in milliseconds
    pub query_timeout_ms: u64,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Wallet store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Command-line overrides; `None` falls back to the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub capacity: Option<usize>,
    pub memory: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values given on the command line
    ///
    /// # Errors
    ///
    /// Returns error if a set variable cannot be parsed
    pub fn from_env(overrides: Overrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_env_required_or("SERVER_BIND", DEFAULT_BIND)?,
        };

        let mut database = DatabaseConfig::from_env();
        if let Some(url) = overrides.database_url {
            database.database_url = url;
        }

        let admission = AdmissionConfig {
            capacity: match overrides.capacity {
                Some(capacity) => capacity,
                None => parse_env_or("ADMISSION_CAPACITY", 50),
            },
            query_timeout_ms: parse_env_or("WALLET_QUERY_TIMEOUT_MS", 5_000),
            request_timeout_secs: parse_env_or("REQUEST_TIMEOUT_SECS", 5),
        };

        let store = if overrides.memory {
            StoreBackend::Memory
        } else {
            match std::env::var("WALLET_STORE").ok().as_deref() {
                None | Some("postgres") => StoreBackend::Postgres,
                Some("memory") => StoreBackend::Memory,
                Some(other) => {
                    return Err(ConfigError::Invalid {
                        var: "WALLET_STORE".to_string(),
                        reason: format!("Unknown store {other:?} (expected postgres or memory)"),
                    });
                }
            }
        };

        let metrics_bind = match std::env::var("METRICS_BIND") {
            Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("{raw:?} is not a socket address"),
            })?),
            Err(_) => None,
        };

        Ok(ServerConfig {
            bind,
            database,
            admission,
            store,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.admission.capacity == 0 {
            return Err(ConfigError::Invalid {
                var: "ADMISSION_CAPACITY".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.admission.query_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                var: "WALLET_QUERY_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.admission.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "REQUEST_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.store == StoreBackend::Postgres {
            if self.database.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Cannot exceed max connections ({})",
                        self.database.max_connections
                    ),
                });
            }

            if self.admission.capacity > self.database.max_connections as usize {
                tracing::warn!(
                    capacity = self.admission.capacity,
                    max_connections = self.database.max_connections,
                    "Admission capacity exceeds pool size; excess calls will queue on the pool"
                );
            }
        }

        Ok(())
    }

    /// Gate capacity as a non-zero count
    ///
    /// # Errors
    ///
    /// Returns error if the capacity is zero
    pub fn gate_capacity(&self) -> Result<NonZeroUsize, ConfigError> {
        NonZeroUsize::new(self.admission.capacity).ok_or_else(|| ConfigError::Invalid {
            var: "ADMISSION_CAPACITY".to_string(),
            reason: "Must be greater than 0".to_string(),
        })
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.admission.query_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.admission.request_timeout_secs)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse an environment variable, rejecting values that are set but invalid
fn parse_env_required_or<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    let raw = std::env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse().map_err(|_| ConfigError::Invalid {
        var: key.to_string(),
        reason: format!("{raw:?} could not be parsed"),
    })
}
