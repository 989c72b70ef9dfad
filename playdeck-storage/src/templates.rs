//! Directory-backed template store
//!
//! Templates live in memory like every other record, but their content is also
//! written to `<root>/<playbook_dir>` or `<root>/<inventory_dir>` so that it
//! survives a restart. On startup the directories are scanned and every file
//! with a recognised extension becomes a template again.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use playdeck_api_types::{RecordId, Template, TemplateKind};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{StorageError, StorageResult};
use crate::registry::Registry;

/// Where template files are kept on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateLayout {
    pub root: PathBuf,
    pub playbook_dir: String,
    pub inventory_dir: String,
}

impl TemplateLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            playbook_dir: "playbooks".to_string(),
            inventory_dir: "inventories".to_string(),
        }
    }

    pub fn dir_for(&self, kind: TemplateKind) -> PathBuf {
        match kind {
            TemplateKind::Playbook => self.root.join(&self.playbook_dir),
            TemplateKind::Inventory => self.root.join(&self.inventory_dir),
        }
    }
}

/// Reject names that would escape the template directory
fn validate_file_component(value: &str, what: &str) -> StorageResult<()> {
    if value.trim().is_empty() {
        return Err(StorageError::InvalidInput(format!("template {what} is required")));
    }
    if value.contains('/') || value.contains('\\') || value.contains("..") {
        return Err(StorageError::InvalidInput(format!(
            "template {what} must not contain path separators or '..'"
        )));
    }
    Ok(())
}

/// Template registry plus its on-disk mirror
pub struct TemplateStore {
    layout: TemplateLayout,
    templates: Registry<Template>,
}

impl TemplateStore {
    pub fn new(layout: TemplateLayout) -> Self {
        Self {
            layout,
            templates: Registry::new(),
        }
    }

    /// Create the template directories if they do not exist yet
    pub async fn init(&self) -> StorageResult<()> {
        for kind in TemplateKind::ALL {
            fs::create_dir_all(self.layout.dir_for(kind)).await?;
        }
        Ok(())
    }

    /// Register every template file found on disk, returning how many were loaded
    ///
    /// Files that cannot be read are skipped with a warning.
    pub async fn load_from_disk(&self) -> StorageResult<usize> {
        let mut loaded = 0;
        for kind in TemplateKind::ALL {
            let dir = self.layout.dir_for(kind);
            for path in Self::template_files(&dir, kind).await? {
                match Self::read_template(&path, kind).await {
                    Ok(template) => {
                        let stored = self.templates.insert(template);
                        debug!(template_id = stored.id, name = %stored.name, kind = %kind, "Template loaded");
                        loaded += 1;
                    }
                    Err(e) => warn!(path = %path.display(), "Skipping unreadable template: {}", e),
                }
            }
        }
        info!("Loaded {} templates from {}", loaded, self.layout.root.display());
        Ok(loaded)
    }

    // Matching files in `dir`, sorted by file name.
    async fn template_files(dir: &Path, kind: TemplateKind) -> StorageResult<Vec<PathBuf>> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let accepted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| kind.accepts_extension(ext));
            if accepted && entry.file_type().await?.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    async fn read_template(path: &Path, kind: TemplateKind) -> std::io::Result<Template> {
        let content = fs::read_to_string(path).await?;
        let modified: DateTime<Utc> = fs::metadata(path).await?.modified()?.into();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Template {
            id: 0,
            name,
            description: String::new(),
            content,
            kind,
            variables: Vec::new(),
            filename,
            created_at: modified,
            updated_at: modified,
        })
    }

    /// Templates of `kind`, or all of them
    pub fn list(&self, kind: Option<TemplateKind>) -> Vec<Template> {
        match kind {
            Some(kind) => self.templates.list_where(|t| t.kind == kind),
            None => self.templates.list(),
        }
    }

    pub fn get(&self, id: RecordId) -> StorageResult<Template> {
        self.templates.get(id)
    }

    /// Write the template file and register it
    ///
    /// The filename is always `<name>.<extension for kind>`.
    pub async fn add(&self, mut template: Template) -> StorageResult<Template> {
        validate_file_component(&template.name, "name")?;
        template.filename = format!("{}.{}", template.name, template.kind.extension());

        let path = self.layout.dir_for(template.kind).join(&template.filename);
        fs::write(&path, template.content.as_bytes()).await?;

        let now = Utc::now();
        template.created_at = now;
        template.updated_at = now;
        let stored = self.templates.insert(template);
        info!(template_id = stored.id, path = %path.display(), "Template added");
        Ok(stored)
    }

    /// Overwrite the template with `template.id`, on disk and in memory
    ///
    /// An empty filename keeps the stored one. The creation time is preserved.
    pub async fn update(&self, mut template: Template) -> StorageResult<Template> {
        let existing = self.templates.get(template.id)?;
        if template.filename.trim().is_empty() {
            template.filename = existing.filename.clone();
        }
        validate_file_component(&template.filename, "filename")?;

        let path = self.layout.dir_for(template.kind).join(&template.filename);
        fs::write(&path, template.content.as_bytes()).await?;

        let updated = self.templates.update(template.id, move |stored| {
            template.created_at = stored.created_at;
            template.updated_at = Utc::now();
            *stored = template;
        })?;
        info!(template_id = updated.id, path = %path.display(), "Template updated");
        Ok(updated)
    }
}
