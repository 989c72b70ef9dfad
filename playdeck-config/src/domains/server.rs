//! HTTP server configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,

    /// Server port
    pub port: u16,

    /// Allow cross-origin requests from any origin
    pub enable_cors: bool,

    /// Tag every request with an `X-Request-ID`
    pub enable_request_id: bool,

    /// Trace every request
    pub enable_tracing: bool,

    /// How long to wait for in-flight requests on shutdown
    #[serde(with = "crate::domains::duration::secs")]
    pub shutdown_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            enable_request_id: true,
            enable_tracing: true,
            shutdown_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding a listener
    pub fn listen_address(&self) -> String {
        if self.bind_address.contains(':') && !self.bind_address.starts_with('[') {
            // Bare IPv6 literal
            format!("[{}]:{}", self.bind_address, self.port)
        } else {
            format!("{}:{}", self.bind_address, self.port)
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;
        validate_positive(self.port, "port", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(config.enable_cors);
        assert_eq!(config.listen_address(), "0.0.0.0:8080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_flags_on() {
        let config: ServerConfig = serde_yaml::from_str("port: 9000\nenable_tracing: false\n").unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.enable_cors);
        assert!(config.enable_request_id);
        assert!(!config.enable_tracing);
        assert_eq!(config.shutdown_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_listen_address_brackets_ipv6() {
        let config = ServerConfig {
            bind_address: "::1".to_string(),
            port: 9000,
            ..Default::default()
        };
        assert_eq!(config.listen_address(), "[::1]:9000");
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        config.port = 0;
        assert!(config.validate().is_err());

        config = ServerConfig::default();
        config.bind_address = String::new();
        assert!(config.validate().is_err());
    }
}
