//! Service configuration (environment variables, read once at startup).

use std::net::SocketAddr;
use std::time::Duration;

use catalog_infra::config::{self, ConfigError, DatabaseConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Upper bound on handling one request; expiry cancels the work.
    pub request_timeout: Duration,
    /// Requests allowed per client IP per minute (`0` disables the limit).
    pub rate_limit_per_minute: u32,
    /// `false` keeps products in memory (dev/test).
    pub use_persistent_stores: bool,
    pub database: DatabaseConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(config::process_env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = config::parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
        )?;
        let timeout_secs: u64 = config::parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;
        let rate_limit_per_minute = config::parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", 60)?;
        let use_persistent_stores = config::parse_or(&lookup, "USE_PERSISTENT_STORES", false)?;
        let database = DatabaseConfig::from_lookup(&lookup)?;

        Ok(Self {
            bind_addr,
            request_timeout: Duration::from_secs(timeout_secs),
            rate_limit_per_minute,
            use_persistent_stores,
            database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
        assert_eq!(cfg.rate_limit_per_minute, 60);
        assert!(!cfg.use_persistent_stores);
    }

    #[test]
    fn overrides_and_errors() {
        let cfg = AppConfig::from_lookup(|key| match key {
            "BIND_ADDR" => Some("127.0.0.1:9000".to_string()),
            "USE_PERSISTENT_STORES" => Some("true".to_string()),
            "RATE_LIMIT_PER_MINUTE" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.use_persistent_stores);
        assert_eq!(cfg.rate_limit_per_minute, 0);

        let err = AppConfig::from_lookup(|key| {
            (key == "REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
