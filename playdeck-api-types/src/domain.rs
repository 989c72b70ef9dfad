use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::enums::*;
use crate::ids::RecordId;

/// One invocation of the automation tool against a playbook/inventory pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: RecordId,
    pub playbook: String,
    pub inventory: String,
    /// Failure summary once the run has failed, empty otherwise
    #[serde(default)]
    pub output: String,
    pub status: RunStatus,
    /// 0..=100
    pub progress: u8,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

impl Run {
    /// A freshly accepted run: pending, no progress, started now
    pub fn pending(id: RecordId, playbook: impl Into<String>, inventory: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            playbook: playbook.into(),
            inventory: inventory.into(),
            output: String::new(),
            status: RunStatus::Pending,
            progress: 0,
            start_time: now,
            end_time: None,
            timestamp: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// A leveled log line recorded for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunLogEntry {
    pub id: RecordId,
    #[serde(rename = "task_id")]
    pub run_id: RecordId,
    pub message: String,
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
}

/// A managed target host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: RecordId,
    pub hostname: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub group: String,
    #[serde(default)]
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
}

/// Registration payload for a host; id, status and last check are assigned by the registry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewHost {
    pub hostname: String,
    pub ip: String,
    pub group: String,
    pub description: String,
}

impl NewHost {
    pub fn into_host(self, id: RecordId) -> Host {
        Host {
            id,
            hostname: self.hostname,
            ip: self.ip,
            group: self.group,
            status: HealthStatus::Unknown,
            last_check: Utc::now(),
            description: self.description,
        }
    }
}

/// Operator-facing notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Reusable playbook or inventory content, mirrored to a file on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// A named bundle of tasks and variables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Task definitions, kept opaque
    #[serde(default)]
    pub tasks: Vec<JsonValue>,
    #[serde(default)]
    pub variables: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// A free-form managed file (inventory, playbook, config, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagedFile {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

/// Body of a start-run request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunRequest {
    pub playbook: String,
    pub inventory: String,
    /// Extra variables handed to the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Map<String, JsonValue>>,
}

impl RunRequest {
    pub fn new(playbook: impl Into<String>, inventory: impl Into<String>) -> Self {
        Self {
            playbook: playbook.into(),
            inventory: inventory.into(),
            variables: None,
        }
    }

    /// Name of the first required payload that is empty, if any
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.playbook.trim().is_empty() {
            Some("playbook")
        } else if self.inventory.trim().is_empty() {
            Some("inventory")
        } else {
            None
        }
    }
}

/// Body of a dry-run (check mode) request
pub type CheckRequest = RunRequest;

/// Outcome of a dry-run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub valid: bool,
    pub affected_hosts: Vec<Host>,
    pub message: String,
}
