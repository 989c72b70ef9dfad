//! Handler state
//!
//! Each endpoint group extracts only the context it needs; [`AppContext`]
//! bundles them and hands each out through `FromRef`.

use std::sync::Arc;

use axum::extract::FromRef;
use playdeck_execution::{EventBroadcaster, HostHealthProber, PlaybookChecker, ProcessRunner};
use playdeck_storage::{FileRegistry, HostRegistry, NotificationCenter, RoleRegistry, RunLogRecorder, RunRegistry, TemplateStore};

/// Context for run endpoints
#[derive(Clone)]
pub struct RunsContext {
    pub runner: ProcessRunner,
    pub checker: PlaybookChecker,
    pub runs: Arc<RunRegistry>,
    pub logs: Arc<RunLogRecorder>,
    pub events: Arc<EventBroadcaster>,
    /// Reported as affected by a passing check
    pub hosts: Arc<HostRegistry>,
}

/// Context for host inventory endpoints
#[derive(Clone)]
pub struct HostsContext {
    pub hosts: Arc<HostRegistry>,
    pub prober: Arc<HostHealthProber>,
}

/// Context for templates, roles and files
#[derive(Clone)]
pub struct CatalogContext {
    pub templates: Arc<TemplateStore>,
    pub roles: Arc<RoleRegistry>,
    pub files: Arc<FileRegistry>,
}

#[derive(Clone)]
pub struct NotificationsContext {
    pub notifications: Arc<NotificationCenter>,
}

/// Application context containing all dependencies
#[derive(Clone, FromRef)]
pub struct AppContext {
    pub runs: RunsContext,
    pub hosts: HostsContext,
    pub catalog: CatalogContext,
    pub notifications: NotificationsContext,
}
