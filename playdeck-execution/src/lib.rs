//! Playdeck Execution Pipeline
//!
//! This crate owns everything that touches the external automation tool:
//!
//! - [`ProcessRunner`] launches one `ansible-playbook` process per run, feeds
//!   its stdout and stderr into the [`EventBroadcaster`] and the run log, and
//!   drives the run through its lifecycle in the run registry.
//! - [`EventBroadcaster`] fans each run's output out to any number of live
//!   subscribers. Publishing never waits on a slow subscriber.
//! - [`PlaybookChecker`] performs a dry run (`--check`) and reports the result.
//! - [`HostHealthProber`] probes hosts through a [`ConnectivityCheck`], by
//!   default [`AdHocPing`] (`ansible <host> -m ping`).
//!
//! [`ConnectivityCheck`]: playdeck_interfaces::ConnectivityCheck

pub mod checker;
pub mod error;
pub mod events;
pub mod prober;
pub mod runner;
mod scratch;

#[cfg(all(test, unix))]
pub(crate) mod test_support;

// Re-export main types
pub use checker::{CheckOutcome, PlaybookChecker};
pub use error::{ExecutionError, ExecutionResult};
pub use events::{EventBroadcaster, EventStream, RunEvent, DEFAULT_EVENT_BUFFER};
pub use prober::{AdHocPing, HostHealthProber};
pub use runner::{ProcessRunner, RunHandle, RunnerConfig};
