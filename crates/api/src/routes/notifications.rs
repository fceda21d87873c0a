use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use types::{Notification, NotificationId, UserId};
use utoipa::ToSchema;

use crate::error::{ApiResult, ErrorBody};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct Affected {
    pub count: usize,
}

#[utoipa::path(
    get,
    path = "/v1/users/{id}/notifications",
    tag = "notifications",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Unread first, newest first", body = [Notification]))
)]
pub async fn list_for_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Notification>> {
    Ok(Json(state.catalog.notifications(&UserId(id)).await?))
}

#[utoipa::path(
    put,
    path = "/v1/users/{id}/notifications/read",
    tag = "notifications",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Number of notifications marked read", body = Affected))
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Affected> {
    let count = state.catalog.mark_all_read(&UserId(id)).await?;
    Ok(Json(Affected { count }))
}

#[utoipa::path(
    delete,
    path = "/v1/users/{id}/notifications",
    tag = "notifications",
    params(("id" = String, Path, description = "User ID")),
    responses((status = 200, description = "Number of notifications deleted", body = Affected))
)]
pub async fn delete_for_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Affected> {
    let count = state.catalog.delete_notifications(&UserId(id)).await?;
    Ok(Json(Affected { count }))
}

#[utoipa::path(
    put,
    path = "/v1/notifications/{id}/read",
    tag = "notifications",
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 404, description = "Unknown notification", body = ErrorBody)
    )
)]
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    Ok(Json(state.catalog.mark_read(&NotificationId(id)).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/notifications/{id}",
    tag = "notifications",
    params(("id" = String, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = Notification),
        (status = 404, description = "Unknown notification", body = ErrorBody)
    )
)]
pub async fn delete_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Notification> {
    Ok(Json(state.catalog.delete_notification(&NotificationId(id)).await?))
}
