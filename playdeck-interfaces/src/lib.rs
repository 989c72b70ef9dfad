//! # Playdeck Interfaces
//!
//! Narrow seams between the run pipeline and the things around it.
//!
//! - [`NotificationSink`] - side channel the runner emits completion and failure messages into
//! - [`ConnectivityCheck`] - reachability primitive used by the host health prober
//!
//! Keeping these as traits lets the execution crate be tested with
//! in-process fakes instead of the real automation tool.

pub mod connectivity;
pub mod notifications;

// Re-export commonly used types
pub use connectivity::{ConnectivityCheck, ConnectivityError};
pub use notifications::NotificationSink;
