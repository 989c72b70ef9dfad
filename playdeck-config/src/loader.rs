//! Configuration loading and environment variable handling

use crate::domains::PlaydeckConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "PLAYDECK".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML or JSON file with environment overrides
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<PlaydeckConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: PlaydeckConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else if content.trim().is_empty() {
            PlaydeckConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        // Apply environment variable overrides
        self.apply_env_overrides(&mut config)?;

        // Validate all domains
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<PlaydeckConfig> {
        let mut config = PlaydeckConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<PlaydeckConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut PlaydeckConfig) -> ConfigResult<()> {
        self.apply_server_overrides(&mut config.server)?;
        self.apply_execution_overrides(&mut config.execution);
        self.apply_probe_overrides(&mut config.probe)?;
        self.apply_templates_overrides(&mut config.templates);
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply server config overrides
    fn apply_server_overrides(&self, config: &mut crate::domains::server::ServerConfig) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Ok(port) = self.get_env_var("SERVER_PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid SERVER_PORT: {}", e)))?;
        }

        Ok(())
    }

    /// Apply execution config overrides
    fn apply_execution_overrides(&self, config: &mut crate::domains::execution::ExecutionConfig) {
        if let Ok(command) = self.get_env_var("PLAYBOOK_COMMAND") {
            config.playbook_command = command;
        }
    }

    /// Apply probe config overrides
    ///
    /// `PROBE_TIMEOUT=0` disables the per-host timeout.
    fn apply_probe_overrides(&self, config: &mut crate::domains::probe::ProbeConfig) -> ConfigResult<()> {
        if let Ok(command) = self.get_env_var("PROBE_COMMAND") {
            config.command = command;
        }

        if let Ok(timeout) = self.get_env_var("PROBE_TIMEOUT") {
            let seconds: u64 = timeout
                .parse()
                .map_err(|e| ConfigError::EnvError(format!("Invalid PROBE_TIMEOUT: {}", e)))?;
            config.timeout = (seconds > 0).then_some(Duration::from_secs(seconds));
        }

        Ok(())
    }

    /// Apply template directory overrides
    fn apply_templates_overrides(&self, config: &mut crate::domains::templates::TemplatesConfig) {
        if let Ok(root) = self.get_env_var("TEMPLATES_ROOT") {
            config.root = root.into();
        }
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(&self, config: &mut crate::domains::logging::LoggingConfig) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
