//! Host inventory endpoints

use axum::{extract::State, Json};
use playdeck_api_types::{Host, NewHost};
use playdeck_web::JsonBody;
use tracing::info;

use crate::{context::HostsContext, errors::RestResult};

pub async fn list_hosts(State(ctx): State<HostsContext>) -> Json<Vec<Host>> {
    Json(ctx.hosts.list())
}

/// Register a host; it starts with unknown health
pub async fn add_host(
    State(ctx): State<HostsContext>,
    JsonBody(host): JsonBody<NewHost>,
) -> RestResult<Json<Host>> {
    let host = ctx.hosts.register(host)?;
    info!(host_id = host.id, hostname = %host.hostname, "Host registered");
    Ok(Json(host))
}

/// Probe every host now and return the updated inventory
///
/// Hosts are probed one after another, so the response time grows with the
/// inventory.
pub async fn check_hosts_health(State(ctx): State<HostsContext>) -> Json<Vec<Host>> {
    Json(ctx.prober.probe_all(&ctx.hosts).await)
}
