//! Host health probe configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Host health probe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Executable used for ad-hoc connectivity checks
    pub command: String,

    /// Module passed with `-m`
    pub module: String,

    /// Per-host limit; no limit when unset
    #[serde(with = "crate::domains::duration::optional_secs")]
    pub timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            command: "ansible".to_string(),
            module: "ping".to_string(),
            timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl Validatable for ProbeConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.command, "command", self.domain_name())?;
        validate_required_string(&self.module, "module", self.domain_name())?;
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(self.validation_error("timeout must be greater than 0 seconds"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "probe"
    }
}
