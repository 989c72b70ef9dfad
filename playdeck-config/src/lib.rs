//! Domain-driven configuration management for Playdeck
//!
//! Configuration is split by functional domain (server, execution, probe,
//! templates, logging). Every field has a default, so an empty file or no
//! file at all yields a working configuration. `PLAYDECK_*` environment
//! variables override file values, and every domain validates itself.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    execution::ExecutionConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    probe::ProbeConfig,
    server::ServerConfig,
    templates::TemplatesConfig,
    PlaydeckConfig,
};
