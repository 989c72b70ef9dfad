//! Run execution configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Run execution configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Executable launched for every run
    pub playbook_command: String,

    /// Parent directory for per-run scratch directories (system temp dir if unset)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scratch_dir: Option<PathBuf>,

    /// Number of events buffered per run for slow subscribers
    pub event_buffer: usize,

    /// How long output is still read after a process exits
    #[serde(with = "crate::domains::duration::secs")]
    pub output_drain: Duration,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            playbook_command: "ansible-playbook".to_string(),
            scratch_dir: None,
            event_buffer: 1024,
            output_drain: Duration::from_secs(1),
        }
    }
}

impl Validatable for ExecutionConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.playbook_command, "playbook_command", self.domain_name())?;
        validate_positive(self.event_buffer, "event_buffer", self.domain_name())?;
        if self.output_drain.is_zero() {
            return Err(self.validation_error("output_drain must be greater than 0 seconds"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "execution"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_execution_config_defaults() {
        let config = ExecutionConfig::default();
        assert_eq!(config.playbook_command, "ansible-playbook");
        assert!(config.scratch_dir.is_none());
        assert_eq!(config.event_buffer, 1024);
        assert_eq!(config.output_drain, Duration::from_secs(1));
    }

    #[test]
    fn test_execution_config_validation() {
        let mut config = ExecutionConfig::default();
        assert!(config.validate().is_ok());

        config.event_buffer = 0;
        assert!(config.validate().is_err());

        config = ExecutionConfig::default();
        config.playbook_command = String::new();
        assert!(config.validate().is_err());

        config = ExecutionConfig::default();
        config.output_drain = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
