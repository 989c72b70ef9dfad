//! Shared fixture for the HTTP integration tests

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use playdeck_execution::{
    EventBroadcaster, HostHealthProber, PlaybookChecker, ProcessRunner, RunnerConfig,
};
use playdeck_interfaces::{ConnectivityCheck, ConnectivityError};
use playdeck_rest_api::{
    create_rest_app, AppConfig, AppContext, CatalogContext, HostsContext, NotificationsContext,
    RunsContext,
};
use playdeck_storage::{
    FileRegistry, HostRegistry, NotificationCenter, RoleRegistry, RunLogRecorder, RunRegistry,
    TemplateLayout, TemplateStore,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

/// Hostnames starting with "web" answer the ping
pub struct WebHostsUp;

#[async_trait]
impl ConnectivityCheck for WebHostsUp {
    async fn check(&self, hostname: &str) -> Result<(), ConnectivityError> {
        if hostname.starts_with("web") {
            Ok(())
        } else {
            Err(ConnectivityError::Unreachable("exit status: 4".to_string()))
        }
    }
}

pub struct TestApp {
    pub app: Router,
    pub runs: Arc<RunRegistry>,
    pub notifications: Arc<NotificationCenter>,
    pub template_root: PathBuf,
    _dir: TempDir,
}

/// Write an executable shell script standing in for the playbook command
fn fake_command(dir: &TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("fake-ansible-playbook");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Build the full application with `script` as the playbook command
pub async fn test_app(script: &str) -> TestApp {
    let dir = TempDir::new().unwrap();
    let command = fake_command(&dir, script);
    let config = RunnerConfig {
        playbook_command: command.to_string_lossy().into_owned(),
        scratch_dir: None,
        output_drain: Duration::from_millis(200),
    };

    let runs = Arc::new(RunRegistry::new());
    let logs = Arc::new(RunLogRecorder::new());
    let events = Arc::new(EventBroadcaster::default());
    let hosts = Arc::new(HostRegistry::new());
    let notifications = Arc::new(NotificationCenter::new());

    let template_root = dir.path().join("templates");
    let templates = Arc::new(TemplateStore::new(TemplateLayout::new(&template_root)));
    templates.init().await.unwrap();

    let runner = ProcessRunner::new(
        config.clone(),
        runs.clone(),
        logs.clone(),
        events.clone(),
        notifications.clone(),
    );

    let context = AppContext {
        runs: RunsContext {
            runner,
            checker: PlaybookChecker::new(config),
            runs: runs.clone(),
            logs,
            events,
            hosts: hosts.clone(),
        },
        hosts: HostsContext {
            hosts,
            prober: Arc::new(HostHealthProber::new(Arc::new(WebHostsUp), None)),
        },
        catalog: CatalogContext {
            templates,
            roles: Arc::new(RoleRegistry::new()),
            files: Arc::new(FileRegistry::new()),
        },
        notifications: NotificationsContext {
            notifications: notifications.clone(),
        },
    };

    TestApp {
        app: create_rest_app(context, AppConfig::default()),
        runs,
        notifications,
        template_root,
        _dir: dir,
    }
}

impl TestApp {
    /// Send a request and hand back the response with its body unread
    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    /// Send a request and collect the whole response body as text
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        (status, body_text(response).await)
    }

    /// Send a request expecting a JSON response
    pub async fn send_json(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, text) = self.send(method, uri, body).await;
        (status, serde_json::from_str(&text).unwrap())
    }
}

/// Read a response body to the end
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
