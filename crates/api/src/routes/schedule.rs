use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use types::{EntryId, EntryInput, EntryPatch, EntryStatus, ScheduleEntry};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiResult, ErrorBody};
use crate::routes::catalog::{created, Created};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    pub course: Option<String>,
    pub year: Option<u32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: EntryStatus,
}

#[utoipa::path(
    get,
    path = "/v1/schedule",
    tag = "schedule",
    params(ScheduleQuery),
    responses((status = 200, description = "Lessons ordered by day then slot", body = [ScheduleEntry]))
)]
pub async fn list_schedule(
    State(state): State<AppState>,
    Query(q): Query<ScheduleQuery>,
) -> ApiResult<Vec<ScheduleEntry>> {
    let course = q.course.filter(|c| !c.trim().is_empty());
    Ok(Json(state.catalog.schedule(course, q.year).await?))
}

#[utoipa::path(
    get,
    path = "/v1/schedule/{id}",
    tag = "schedule",
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "The lesson", body = ScheduleEntry),
        (status = 404, description = "Unknown lesson", body = ErrorBody)
    )
)]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ScheduleEntry> {
    Ok(Json(state.catalog.entry(&EntryId(id)).await?))
}

#[utoipa::path(
    post,
    path = "/v1/schedule",
    tag = "schedule",
    request_body = EntryInput,
    responses(
        (status = 201, description = "Lesson added by hand; admins and the teacher are notified", body = ScheduleEntry),
        (status = 400, description = "Invalid lesson", body = ErrorBody)
    )
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Json(input): Json<EntryInput>,
) -> Created<ScheduleEntry> {
    Ok(created(state.catalog.create_entry(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/schedule/{id}",
    tag = "schedule",
    params(("id" = String, Path, description = "Schedule entry ID")),
    request_body = EntryPatch,
    responses(
        (status = 200, description = "Lesson updated", body = ScheduleEntry),
        (status = 404, description = "Unknown lesson", body = ErrorBody)
    )
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<EntryPatch>,
) -> ApiResult<ScheduleEntry> {
    Ok(Json(state.catalog.update_entry(&EntryId(id), patch).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/schedule/{id}",
    tag = "schedule",
    params(("id" = String, Path, description = "Schedule entry ID")),
    responses(
        (status = 200, description = "Lesson deleted", body = ScheduleEntry),
        (status = 404, description = "Unknown lesson", body = ErrorBody)
    )
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ScheduleEntry> {
    Ok(Json(state.catalog.delete_entry(&EntryId(id)).await?))
}

#[utoipa::path(
    put,
    path = "/v1/schedule/{id}/status",
    tag = "schedule",
    params(("id" = String, Path, description = "Schedule entry ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed; every admin is notified", body = ScheduleEntry),
        (status = 404, description = "Unknown lesson", body = ErrorBody)
    )
)]
pub async fn set_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<StatusUpdate>,
) -> ApiResult<ScheduleEntry> {
    Ok(Json(state.catalog.set_entry_status(&EntryId(id), body.status).await?))
}
