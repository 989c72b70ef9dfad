//! Host inventory operations

use chrono::{DateTime, Utc};
use playdeck_api_types::{HealthStatus, Host, NewHost, RecordId};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::registry::Registry;

impl Registry<Host> {
    /// Register a host with unknown health
    pub fn register(&self, host: NewHost) -> StorageResult<Host> {
        if host.hostname.trim().is_empty() {
            return Err(StorageError::InvalidInput("hostname is required".to_string()));
        }
        let stored = self.insert_with(|id| host.into_host(id));
        debug!(host_id = stored.id, hostname = %stored.hostname, "Host registered");
        Ok(stored)
    }

    /// Store the outcome of a health probe
    pub fn record_health(
        &self,
        id: RecordId,
        status: HealthStatus,
        checked_at: DateTime<Utc>,
    ) -> StorageResult<Host> {
        self.update(id, |host| {
            host.status = status;
            host.last_check = checked_at;
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::HostRegistry;

    use super::*;

    fn new_host(name: &str) -> NewHost {
        NewHost {
            hostname: name.to_string(),
            ip: "10.0.0.5".to_string(),
            group: "web".to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_register_starts_unknown() {
        let hosts = HostRegistry::new();
        let host = hosts.register(new_host("web-01")).unwrap();
        assert_eq!(host.id, 1);
        assert_eq!(host.status, HealthStatus::Unknown);
        assert_eq!(hosts.list().len(), 1);
    }

    #[test]
    fn test_register_rejects_blank_hostname() {
        let hosts = HostRegistry::new();
        let err = hosts.register(new_host("  ")).unwrap_err();
        assert!(matches!(err, StorageError::InvalidInput(_)));
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_record_health() {
        let hosts = HostRegistry::new();
        let host = hosts.register(new_host("web-01")).unwrap();
        let checked_at = Utc::now();
        let updated = hosts
            .record_health(host.id, HealthStatus::Unhealthy, checked_at)
            .unwrap();
        assert_eq!(updated.status, HealthStatus::Unhealthy);
        assert_eq!(updated.last_check, checked_at);
        assert_eq!(updated.hostname, "web-01");

        assert!(hosts
            .record_health(99, HealthStatus::Healthy, checked_at)
            .unwrap_err()
            .is_not_found());
    }
}
