//! Per-run scratch directories

use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};
use tempfile::TempDir;

pub(crate) const PLAYBOOK_FILE: &str = "playbook.yml";
pub(crate) const INVENTORY_FILE: &str = "inventory.ini";

/// Temporary copies of a run's playbook and inventory
///
/// The directory and both files are removed when this value is dropped.
pub(crate) struct ScratchDir {
    dir: TempDir,
    pub playbook: PathBuf,
    pub inventory: PathBuf,
}

impl ScratchDir {
    /// Create the directory (under `parent` when given) and write both payloads
    pub async fn create(parent: Option<&Path>, playbook: &str, inventory: &str) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("playdeck-run-");
        let dir = match parent {
            Some(parent) => builder.tempdir_in(parent)?,
            None => builder.tempdir()?,
        };

        let playbook_path = dir.path().join(PLAYBOOK_FILE);
        let inventory_path = dir.path().join(INVENTORY_FILE);
        tokio::fs::write(&playbook_path, playbook).await?;
        tokio::fs::write(&inventory_path, inventory).await?;

        Ok(Self {
            dir,
            playbook: playbook_path,
            inventory: inventory_path,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// The `-e` argument for the given extra variables, if there are any
pub(crate) fn extra_vars_arg(variables: Option<&Map<String, JsonValue>>) -> Option<String> {
    variables
        .filter(|vars| !vars.is_empty())
        .map(|vars| JsonValue::Object(vars.clone()).to_string())
}
