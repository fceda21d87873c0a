use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use types::{Preference, PreferenceId, PreferenceInput, Teacher, TeacherId, TeacherInput};
use utoipa::IntoParams;

use crate::error::{ApiResult, ErrorBody};
use crate::routes::catalog::{created, Created};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TeacherSearch {
    /// Case-insensitive match on name, email or any subject.
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/v1/teachers",
    tag = "teachers",
    params(TeacherSearch),
    responses((status = 200, description = "Matching teachers", body = [Teacher]))
)]
pub async fn list_teachers(
    State(state): State<AppState>,
    Query(q): Query<TeacherSearch>,
) -> ApiResult<Vec<Teacher>> {
    Ok(Json(state.catalog.teachers(q.search.as_deref()).await?))
}

#[utoipa::path(
    post,
    path = "/v1/teachers",
    tag = "teachers",
    request_body = TeacherInput,
    responses(
        (status = 201, description = "Teacher and linked login created", body = Teacher),
        (status = 400, description = "Invalid teacher or email already in use", body = ErrorBody)
    )
)]
pub async fn create_teacher(
    State(state): State<AppState>,
    Json(input): Json<TeacherInput>,
) -> Created<Teacher> {
    Ok(created(state.catalog.create_teacher(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/teachers/{id}",
    tag = "teachers",
    params(("id" = String, Path, description = "Teacher ID")),
    request_body = TeacherInput,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 404, description = "Unknown teacher", body = ErrorBody)
    )
)]
pub async fn update_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<TeacherInput>,
) -> ApiResult<Teacher> {
    Ok(Json(state.catalog.update_teacher(TeacherId(id), input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/teachers/{id}",
    tag = "teachers",
    params(("id" = String, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher and their lessons deleted", body = Teacher),
        (status = 404, description = "Unknown teacher", body = ErrorBody)
    )
)]
pub async fn delete_teacher(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Teacher> {
    Ok(Json(state.catalog.delete_teacher(&TeacherId(id)).await?))
}

#[utoipa::path(
    get,
    path = "/v1/teachers/{id}/preferences",
    tag = "teachers",
    params(("id" = String, Path, description = "Teacher ID")),
    responses((status = 200, description = "Slot preferences of the teacher", body = [Preference]))
)]
pub async fn list_preferences(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Preference>> {
    Ok(Json(state.catalog.preferences_for(&TeacherId(id)).await?))
}

#[utoipa::path(
    post,
    path = "/v1/preferences",
    tag = "teachers",
    request_body = PreferenceInput,
    responses(
        (status = 201, description = "Preference recorded", body = Preference),
        (status = 404, description = "Unknown teacher", body = ErrorBody)
    )
)]
pub async fn create_preference(
    State(state): State<AppState>,
    Json(input): Json<PreferenceInput>,
) -> Created<Preference> {
    Ok(created(state.catalog.create_preference(input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/preferences/{id}",
    tag = "teachers",
    params(("id" = String, Path, description = "Preference ID")),
    responses(
        (status = 200, description = "Preference deleted", body = Preference),
        (status = 404, description = "Unknown preference", body = ErrorBody)
    )
)]
pub async fn delete_preference(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Preference> {
    Ok(Json(state.catalog.delete_preference(&PreferenceId(id)).await?))
}
