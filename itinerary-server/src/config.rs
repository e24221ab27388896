//! Server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but can't be parsed
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory whose files are loaded at startup.
    pub fixtures_dir: PathBuf,

    /// Number of concurrent ingest workers.
    pub workers: usize,

    /// Address to listen on.
    pub bind: IpAddr,

    pub port: u16,

    /// Default `tracing` filter; `RUST_LOG` takes precedence when set.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("./fixtures"),
            workers: 5,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub const FIXTURES_DIR: &'static str = "ITINERARY_FIXTURES_DIR";
    pub const WORKERS: &'static str = "ITINERARY_WORKERS";
    pub const BIND: &'static str = "ITINERARY_BIND";
    pub const PORT: &'static str = "ITINERARY_PORT";
    pub const LOG: &'static str = "ITINERARY_LOG";

    /// Read settings from the process environment, defaulting anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(Self::FIXTURES_DIR) {
            config.fixtures_dir = PathBuf::from(dir);
        }
        if let Some(value) = get(Self::WORKERS) {
            config.workers = parse(Self::WORKERS, &value)?;
            if config.workers == 0 {
                return Err(ConfigError::Invalid {
                    key: Self::WORKERS,
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
        }
        if let Some(value) = get(Self::BIND) {
            config.bind = parse(Self::BIND, &value)?;
        }
        if let Some(value) = get(Self::PORT) {
            config.port = parse(Self::PORT, &value)?;
        }
        if let Some(filter) = get(Self::LOG) {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Socket address the server listens on.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
