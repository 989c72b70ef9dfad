//! Role and managed file endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use playdeck_api_types::{ManagedFile, Role};
use playdeck_web::JsonBody;

use super::TypeFilter;
use crate::{context::CatalogContext, errors::RestResult};

pub async fn list_roles(State(ctx): State<CatalogContext>) -> Json<Vec<Role>> {
    Json(ctx.roles.list())
}

pub async fn add_role(
    State(ctx): State<CatalogContext>,
    JsonBody(role): JsonBody<Role>,
) -> RestResult<Json<Role>> {
    Ok(Json(ctx.roles.add_role(role)?))
}

/// Files, optionally restricted to one `?type=`
pub async fn list_files(
    State(ctx): State<CatalogContext>,
    Query(filter): Query<TypeFilter>,
) -> Json<Vec<ManagedFile>> {
    Json(ctx.files.list_files(filter.value()))
}

pub async fn add_file(
    State(ctx): State<CatalogContext>,
    JsonBody(file): JsonBody<ManagedFile>,
) -> RestResult<Json<ManagedFile>> {
    Ok(Json(ctx.files.add_file(file)?))
}

/// Replace the file whose id is in the body
pub async fn update_file(
    State(ctx): State<CatalogContext>,
    JsonBody(file): JsonBody<ManagedFile>,
) -> RestResult<Json<ManagedFile>> {
    Ok(Json(ctx.files.update_file(file.id, file)?))
}
