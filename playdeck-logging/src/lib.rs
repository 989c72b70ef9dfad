//! Logging setup for Playdeck
//!
//! Every crate logs through `tracing`. The binary calls
//! [`init_logging_from_config`] once at startup to install a global
//! `tracing-subscriber` formatter.

pub mod init;

pub use init::{build_env_filter, init_logging_from_config, init_simple_tracing};
