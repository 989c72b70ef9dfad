//! Role and managed-file catalogs

use chrono::Utc;
use playdeck_api_types::{ManagedFile, RecordId, Role};

use crate::error::{StorageError, StorageResult};
use crate::registry::Registry;

fn require_name(name: &str, what: &str) -> StorageResult<()> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidInput(format!("{what} name is required")));
    }
    Ok(())
}

impl Registry<Role> {
    /// Store a role, stamping both timestamps with the current time
    pub fn add_role(&self, mut role: Role) -> StorageResult<Role> {
        require_name(&role.name, "role")?;
        let now = Utc::now();
        role.created_at = now;
        role.updated_at = now;
        Ok(self.insert(role))
    }
}

impl Registry<ManagedFile> {
    pub fn add_file(&self, mut file: ManagedFile) -> StorageResult<ManagedFile> {
        require_name(&file.name, "file")?;
        let now = Utc::now();
        file.created_at = now;
        file.updated_at = now;
        Ok(self.insert(file))
    }

    /// Replace the stored file with `id`, keeping its creation time
    pub fn update_file(&self, id: RecordId, file: ManagedFile) -> StorageResult<ManagedFile> {
        require_name(&file.name, "file")?;
        self.update(id, move |stored| {
            let created_at = stored.created_at;
            *stored = file;
            stored.created_at = created_at;
            stored.updated_at = Utc::now();
        })
    }

    /// Files whose type equals `kind`, or all files when `kind` is `None`
    pub fn list_files(&self, kind: Option<&str>) -> Vec<ManagedFile> {
        match kind {
            Some(kind) => self.list_where(|file| file.kind == kind),
            None => self.list(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileRegistry, RoleRegistry};
    use chrono::DateTime;

    fn file(name: &str, kind: &str) -> ManagedFile {
        ManagedFile {
            id: 0,
            name: name.to_string(),
            kind: kind.to_string(),
            content: "[web]\nweb-01".to_string(),
            description: String::new(),
            created_at: DateTime::default(),
            updated_at: DateTime::default(),
        }
    }

    #[test]
    fn test_add_role_sets_timestamps() {
        let roles = RoleRegistry::new();
        let role = roles
            .add_role(Role {
                id: 0,
                name: "webserver".to_string(),
                description: String::new(),
                tasks: vec![serde_json::json!({"name": "install nginx"})],
                variables: vec!["port".to_string()],
                dependencies: Vec::new(),
                created_at: DateTime::default(),
                updated_at: DateTime::default(),
            })
            .unwrap();
        assert_eq!(role.id, 1);
        assert_eq!(role.created_at, role.updated_at);
        assert!(role.created_at > DateTime::<Utc>::default());
    }

    #[test]
    fn test_update_file_keeps_created_at() {
        let files = FileRegistry::new();
        let stored = files.add_file(file("hosts", "inventory")).unwrap();

        let mut changed = file("hosts", "inventory");
        changed.content = "[db]\ndb-01".to_string();
        let updated = files.update_file(stored.id, changed).unwrap();

        assert_eq!(updated.id, stored.id);
        assert_eq!(updated.created_at, stored.created_at);
        assert!(updated.updated_at >= stored.updated_at);
        assert_eq!(files.get(stored.id).unwrap().content, "[db]\ndb-01");
    }

    #[test]
    fn test_update_missing_file_is_not_found() {
        let files = FileRegistry::new();
        let err = files.update_file(7, file("x", "config")).unwrap_err();
        assert!(err.is_not_found());
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_files_by_type() {
        let files = FileRegistry::new();
        files.add_file(file("hosts", "inventory")).unwrap();
        files.add_file(file("site", "playbook")).unwrap();
        files.add_file(file("staging", "inventory")).unwrap();

        assert_eq!(files.list_files(Some("inventory")).len(), 2);
        assert_eq!(files.list_files(Some("config")).len(), 0);
        assert_eq!(files.list_files(None).len(), 3);
    }

    #[test]
    fn test_blank_names_rejected() {
        let files = FileRegistry::new();
        assert!(matches!(
            files.add_file(file("", "config")),
            Err(StorageError::InvalidInput(_))
        ));
    }
}
