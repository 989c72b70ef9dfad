//! Service construction and dependency wiring

use std::sync::Arc;

use anyhow::{Context, Result};

use playdeck_config::PlaydeckConfig;
use playdeck_execution::{
    AdHocPing, EventBroadcaster, HostHealthProber, PlaybookChecker, ProcessRunner, RunnerConfig,
};
use playdeck_rest_api::{AppContext, CatalogContext, HostsContext, NotificationsContext, RunsContext};
use playdeck_storage::{
    FileRegistry, HostRegistry, NotificationCenter, RoleRegistry, RunLogRecorder, RunRegistry,
    TemplateLayout, TemplateStore,
};

/// Service container holding all application services
///
/// Every registry is created once here and shared by handle; nothing lives in
/// process-wide statics.
#[derive(Clone)]
pub struct ServiceContainer {
    pub runs: Arc<RunRegistry>,
    pub logs: Arc<RunLogRecorder>,
    pub events: Arc<EventBroadcaster>,
    pub hosts: Arc<HostRegistry>,
    pub roles: Arc<RoleRegistry>,
    pub files: Arc<FileRegistry>,
    pub notifications: Arc<NotificationCenter>,
    pub templates: Arc<TemplateStore>,
    pub runner: ProcessRunner,
    pub checker: PlaybookChecker,
    pub prober: Arc<HostHealthProber>,
}

impl ServiceContainer {
    /// Build every service and load stored templates from disk
    pub async fn new(config: &PlaydeckConfig) -> Result<Self> {
        let runs = Arc::new(RunRegistry::new());
        let logs = Arc::new(RunLogRecorder::new());
        let events = Arc::new(EventBroadcaster::new(config.execution.event_buffer));
        let hosts = Arc::new(HostRegistry::new());
        let notifications = Arc::new(NotificationCenter::new());

        let runner_config = RunnerConfig {
            playbook_command: config.execution.playbook_command.clone(),
            scratch_dir: config.execution.scratch_dir.clone(),
            output_drain: config.execution.output_drain,
        };
        let runner = ProcessRunner::new(
            runner_config.clone(),
            runs.clone(),
            logs.clone(),
            events.clone(),
            notifications.clone(),
        );
        let checker = PlaybookChecker::new(runner_config);

        let ping = AdHocPing::new(&config.probe.command, &config.probe.module);
        let prober = Arc::new(HostHealthProber::new(Arc::new(ping), config.probe.timeout));

        let templates = Arc::new(create_template_store(config).await?);

        Ok(Self {
            runs,
            logs,
            events,
            hosts,
            roles: Arc::new(RoleRegistry::new()),
            files: Arc::new(FileRegistry::new()),
            notifications,
            templates,
            runner,
            checker,
            prober,
        })
    }

    /// Handler state for the REST API
    pub fn app_context(&self) -> AppContext {
        AppContext {
            runs: RunsContext {
                runner: self.runner.clone(),
                checker: self.checker.clone(),
                runs: self.runs.clone(),
                logs: self.logs.clone(),
                events: self.events.clone(),
                hosts: self.hosts.clone(),
            },
            hosts: HostsContext {
                hosts: self.hosts.clone(),
                prober: self.prober.clone(),
            },
            catalog: CatalogContext {
                templates: self.templates.clone(),
                roles: self.roles.clone(),
                files: self.files.clone(),
            },
            notifications: NotificationsContext {
                notifications: self.notifications.clone(),
            },
        }
    }
}

async fn create_template_store(config: &PlaydeckConfig) -> Result<TemplateStore> {
    let layout = TemplateLayout {
        root: config.templates.root.clone(),
        playbook_dir: config.templates.playbook_dir.clone(),
        inventory_dir: config.templates.inventory_dir.clone(),
    };
    let store = TemplateStore::new(layout);

    store
        .init()
        .await
        .with_context(|| format!("Failed to create template directories under {}", config.templates.root.display()))?;
    store
        .load_from_disk()
        .await
        .context("Failed to load templates")?;

    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_container_loads_existing_templates() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("templates");
        std::fs::create_dir_all(root.join("playbooks")).unwrap();
        std::fs::write(root.join("playbooks/site.yml"), "- hosts: all").unwrap();

        let mut config = PlaydeckConfig::default();
        config.templates.root = root.clone();

        let services = ServiceContainer::new(&config).await.unwrap();
        let templates = services.templates.list(None);
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "site");
        assert!(root.join("inventories").is_dir());
    }

    #[tokio::test]
    async fn test_context_shares_registries() {
        let dir = TempDir::new().unwrap();
        let mut config = PlaydeckConfig::default();
        config.templates.root = dir.path().to_path_buf();

        let services = ServiceContainer::new(&config).await.unwrap();
        let context = services.app_context();
        assert!(Arc::ptr_eq(&context.runs.runs, &services.runs));
        assert!(Arc::ptr_eq(&context.runs.hosts, &context.hosts.hosts));
    }
}
