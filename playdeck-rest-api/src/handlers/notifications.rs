//! Notification endpoints

use axum::{extract::State, Json};
use playdeck_api_types::{Notification, RecordId};
use playdeck_web::JsonBody;
use serde::Deserialize;
use tracing::debug;

use crate::{context::NotificationsContext, errors::RestResult};

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub id: RecordId,
}

pub async fn list_notifications(State(ctx): State<NotificationsContext>) -> Json<Vec<Notification>> {
    Json(ctx.notifications.list())
}

/// Mark one notification read and return it; unknown ids are 404
pub async fn mark_notification_read(
    State(ctx): State<NotificationsContext>,
    JsonBody(request): JsonBody<MarkReadRequest>,
) -> RestResult<Json<Notification>> {
    let notification = ctx.notifications.mark_read(request.id)?;
    debug!(
        notification_id = notification.id,
        unread = ctx.notifications.unread_count(),
        "Notification marked read"
    );
    Ok(Json(notification))
}
