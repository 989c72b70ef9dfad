//! Middleware for the Playdeck HTTP API

pub mod cors;
pub mod preflight;
pub mod request_id;

pub use cors::{cors_layer, cors_layer_with_config, CorsConfig};
pub use preflight::preflight_middleware;
pub use request_id::{request_id_middleware, REQUEST_ID_HEADER};
