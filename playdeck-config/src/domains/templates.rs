//! Template directory configuration

use crate::error::ConfigResult;
use crate::validation::{validate_path_component, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where templates are mirrored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Root of the template tree
    pub root: PathBuf,

    /// Subdirectory holding playbook templates
    pub playbook_dir: String,

    /// Subdirectory holding inventory templates
    pub inventory_dir: String,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./templates"),
            playbook_dir: "playbooks".to_string(),
            inventory_dir: "inventories".to_string(),
        }
    }
}

impl Validatable for TemplatesConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.root.as_os_str().is_empty() {
            return Err(self.validation_error("root cannot be empty"));
        }
        validate_path_component(&self.playbook_dir, "playbook_dir", self.domain_name())?;
        validate_path_component(&self.inventory_dir, "inventory_dir", self.domain_name())?;
        if self.playbook_dir == self.inventory_dir {
            return Err(self.validation_error("playbook_dir and inventory_dir must differ"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "templates"
    }
}
