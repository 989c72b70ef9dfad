//! In-memory storage for the Playdeck control plane
//!
//! Every collection is an owned object with its own lock, constructed once at
//! startup and shared behind an `Arc`. Nothing is persisted except template
//! content, which is mirrored to a directory tree. Collections grow for the
//! lifetime of the process; there is no eviction.

pub mod catalog;
pub mod error;
pub mod hosts;
pub mod notifications;
pub mod registry;
pub mod run_logs;
pub mod runs;
pub mod templates;

// Re-export main types
pub use error::{StorageError, StorageResult};
pub use notifications::NotificationCenter;
pub use registry::{Record, Registry};
pub use run_logs::RunLogRecorder;
pub use runs::{RunRegistry, RunTransition, TransitionOutcome};
pub use templates::{TemplateLayout, TemplateStore};

/// Host inventory
pub type HostRegistry = Registry<playdeck_api_types::Host>;
/// Role catalog
pub type RoleRegistry = Registry<playdeck_api_types::Role>;
/// Managed file catalog
pub type FileRegistry = Registry<playdeck_api_types::ManagedFile>;
