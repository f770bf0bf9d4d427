//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated
//! configuration.

use std::net::SocketAddr;

use nl_holdem::TableConfig;

/// Complete server configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Table configuration
    pub table: TableConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    ///
    /// Unparseable variables fall back to their defaults; semantic problems
    /// surface from [`ServerConfig::validate`].
    pub fn from_env(bind_override: Option<SocketAddr>) -> Self {
        let bind = bind_override
            .or_else(|| {
                std::env::var("SERVER_BIND")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or_else(|| {
                "127.0.0.1:7777"
                    .parse()
                    .expect("default bind address is valid")
            });

        let defaults = TableConfig::default();
        let table = TableConfig {
            small_blind: parse_env_or("TABLE_SMALL_BLIND", defaults.small_blind),
            big_blind: parse_env_or("TABLE_BIG_BLIND", defaults.big_blind),
            min_buy_in: parse_env_or("TABLE_MIN_BUY_IN", defaults.min_buy_in),
            max_buy_in: parse_env_or("TABLE_MAX_BUY_IN", defaults.max_buy_in),
            max_seats: parse_env_or("TABLE_MAX_SEATS", defaults.max_seats),
            showdown_pause_ms: parse_env_or("TABLE_SHOWDOWN_PAUSE_MS", defaults.showdown_pause_ms),
        };

        ServerConfig { bind, table }
    }

    /// Validate configuration after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.table
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                var: "TABLE_*".to_string(),
                reason,
            })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse an environment variable with default fallback.
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
