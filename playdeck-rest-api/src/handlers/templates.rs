//! Template endpoints

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    Json,
};
use playdeck_api_types::{Template, TemplateKind};
use playdeck_web::JsonBody;

use super::TypeFilter;
use crate::{
    context::CatalogContext,
    errors::{RestError, RestResult},
};

/// Templates, optionally restricted to `?type=playbook|inventory`
pub async fn list_templates(
    State(ctx): State<CatalogContext>,
    Query(filter): Query<TypeFilter>,
) -> RestResult<Json<Vec<Template>>> {
    let kind = filter
        .value()
        .map(TemplateKind::from_str)
        .transpose()
        .map_err(|e| RestError::bad_request(e.to_string()))?;
    Ok(Json(ctx.templates.list(kind)))
}

pub async fn add_template(
    State(ctx): State<CatalogContext>,
    JsonBody(template): JsonBody<Template>,
) -> RestResult<Json<Template>> {
    Ok(Json(ctx.templates.add(template).await?))
}

pub async fn update_template(
    State(ctx): State<CatalogContext>,
    JsonBody(template): JsonBody<Template>,
) -> RestResult<Json<Template>> {
    Ok(Json(ctx.templates.update(template).await?))
}
