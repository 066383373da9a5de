// SPDX-License-Identifier: MIT

//! Runtime configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file); command-line flags override them in `main`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::error::{Result, TransitError};
use crate::workflow::ValidationMode;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| TransitError::config(format!("Invalid host address: {}", self.host)))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub server: ServerConfig,
    pub validation: ValidationMode,
    /// Directory of definition files registered at startup
    pub definitions_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// `main` loads `.env` before calling this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("TRANSIT_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                TransitError::config(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_PORT,
        };

        let validation = match lookup("TRANSIT_VALIDATION") {
            Some(raw) => raw.parse::<ValidationMode>().map_err(TransitError::Config)?,
            None => ValidationMode::default(),
        };

        let definitions_dir = lookup("TRANSIT_DEFINITIONS_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Config {
            server: ServerConfig { host, port },
            validation,
            definitions_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.validation, ValidationMode::Strict);
        assert!(config.definitions_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("TRANSIT_HOST", "0.0.0.0"),
            ("PORT", "9000"),
            ("TRANSIT_VALIDATION", "permissive"),
            ("TRANSIT_DEFINITIONS_DIR", "workflows"),
        ]))
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.validation, ValidationMode::Permissive);
        assert_eq!(config.definitions_dir, Some(PathBuf::from("workflows")));
        assert_eq!(
            config.server.socket_addr().unwrap(),
            "0.0.0.0:9000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, TransitError::Config(_)));
    }

    #[test]
    fn test_invalid_validation_mode() {
        let err =
            Config::from_lookup(lookup_from(&[("TRANSIT_VALIDATION", "loose")])).unwrap_err();
        assert!(err.to_string().contains("Unknown validation mode"));
    }

    #[test]
    fn test_blank_definitions_dir_is_ignored() {
        let config =
            Config::from_lookup(lookup_from(&[("TRANSIT_DEFINITIONS_DIR", "  ")])).unwrap();
        assert!(config.definitions_dir.is_none());
    }

    #[test]
    fn test_invalid_host() {
        let server = ServerConfig {
            host: "localhost:80".to_string(),
            port: 1,
        };
        assert!(server.socket_addr().is_err());
    }
}
