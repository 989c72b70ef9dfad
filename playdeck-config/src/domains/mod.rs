//! Domain-specific configuration modules

pub mod duration;
pub mod execution;
pub mod logging;
pub mod probe;
pub mod server;
pub mod templates;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main Playdeck configuration combining all domains
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaydeckConfig {
    /// HTTP server configuration
    pub server: server::ServerConfig,

    /// Run execution configuration
    pub execution: execution::ExecutionConfig,

    /// Host health probe configuration
    pub probe: probe::ProbeConfig,

    /// Template directory configuration
    pub templates: templates::TemplatesConfig,

    /// Logging configuration
    pub logging: logging::LoggingConfig,
}

impl PlaydeckConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.execution.validate()?;
        self.probe.validate()?;
        self.templates.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Render this configuration as YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        PlaydeckConfig::default()
            .to_yaml()
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
