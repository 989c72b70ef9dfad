//! Domain records for the Playdeck control plane
//!
//! Every record here is plain data: registries in `playdeck-storage` own the
//! mutable copies and hand out clones, and the REST layer serializes them
//! directly. Field names match the JSON shape the dashboard consumes.

pub mod domain;
pub mod enums;
pub mod ids;

// Re-export main types for convenience
pub use domain::{
    CheckRequest, CheckResponse, Host, ManagedFile, NewHost, Notification, Role, Run, RunLogEntry,
    RunRequest, Template,
};
pub use enums::{EnumParseError, HealthStatus, LogLevel, NotificationKind, RunStatus, TemplateKind};
pub use ids::{IdSequence, RecordId};
