//! Playdeck Server
//!
//! Wires the registries, the execution pipeline and the REST API together and
//! serves them until a shutdown signal arrives.

pub mod services;
pub mod startup;

// Re-export main components
pub use services::ServiceContainer;
pub use startup::Server;
