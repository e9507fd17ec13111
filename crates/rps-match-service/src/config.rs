//! Service configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings.
///
/// - `PORT`: listen port (default 3000)
/// - `BIND_ADDR`: listen address (default 0.0.0.0)
/// - `MATCH_STATE_PATH`: JSON snapshot file; unset keeps state in memory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub state_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            state_path: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            config.port = value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value })?;
        }
        if let Some(value) = lookup("BIND_ADDR") {
            config.bind_addr = value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "BIND_ADDR", value })?;
        }
        config.state_path = lookup("MATCH_STATE_PATH")
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("MATCH_STATE_PATH", "/tmp/match.json"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.state_path, Some(PathBuf::from("/tmp/match.json")));
    }

    #[test]
    fn test_invalid_port() {
        let err = ServiceConfig::from_lookup(lookup(&[("PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "invalid PORT: \"http\"");
    }

    #[test]
    fn test_empty_state_path_means_memory() {
        let config = ServiceConfig::from_lookup(lookup(&[("MATCH_STATE_PATH", "")])).unwrap();
        assert_eq!(config.state_path, None);
    }
}
