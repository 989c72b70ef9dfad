//! Service health endpoint

use axum::Json;
use serde_json::{json, Value};

/// Liveness check; does not touch any registry
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
