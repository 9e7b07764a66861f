//! Process configuration read from environment variables.
//!
//! A `.env` file in the working directory is loaded first by the binary, so
//! every value below can live there as well.

use std::net::{AddrParseError, IpAddr, Ipv4Addr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

use model_service::DEFAULT_MODEL_PATH;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid HOST value {value:?}: {source}")]
    InvalidHost {
        value: String,
        #[source]
        source: AddrParseError,
    },
}

/// Settings for the inference API process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Location of the trained model artifact (`MODEL_PATH`)
    pub model_path: PathBuf,

    /// Bind address (`HOST`)
    pub host: IpAddr,

    /// Listen port (`PORT`)
    pub port: u16,

    /// Deployment environment name (`ENV`)
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
        }
    }
}

impl ServerConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => defaults.port,
        };

        let host = match lookup("HOST") {
            Some(value) => value
                .trim()
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { value, source })?,
            None => defaults.host,
        };

        Ok(Self {
            model_path: lookup("MODEL_PATH").map_or(defaults.model_path, PathBuf::from),
            host,
            port,
            environment: lookup("ENV").unwrap_or(defaults.environment),
        })
    }

    /// Debug mode is on only for the development environment.
    pub fn is_debug(&self) -> bool {
        self.environment == DEFAULT_ENVIRONMENT
    }

    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.model_path, PathBuf::from("model/model.pkl"));
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_debug());
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("MODEL_PATH", "/srv/models/iris.pkl"),
            ("PORT", "9100"),
            ("HOST", "127.0.0.1"),
            ("ENV", "production"),
        ]))
        .unwrap();

        assert_eq!(config.model_path, PathBuf::from("/srv/models/iris.pkl"));
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:9100");
        assert!(!config.is_debug());
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("eighty"));

        let err = ServerConfig::from_lookup(lookup_from(&[("PORT", "70000")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
    }

    #[test]
    fn test_invalid_host() {
        let err = ServerConfig::from_lookup(lookup_from(&[("HOST", "not-an-ip")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidHost { .. }));
    }
}
