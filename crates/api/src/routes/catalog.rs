//! Courses, subjects, classrooms and constraints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use types::{
    Classroom, ClassroomId, ClassroomInput, Constraint, ConstraintId, ConstraintInput, Course,
    CourseId, CourseInput, Subject, SubjectId, SubjectInput,
};

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::state::AppState;

pub type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

pub fn created<T>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}

// courses

#[utoipa::path(
    get,
    path = "/v1/courses",
    tag = "catalog",
    responses((status = 200, description = "All courses", body = [Course]))
)]
pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Vec<Course>> {
    Ok(Json(state.catalog.courses().await?))
}

#[utoipa::path(
    post,
    path = "/v1/courses",
    tag = "catalog",
    request_body = CourseInput,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, description = "Invalid or duplicate course", body = ErrorBody)
    )
)]
pub async fn create_course(
    State(state): State<AppState>,
    Json(input): Json<CourseInput>,
) -> Created<Course> {
    Ok(created(state.catalog.create_course(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/courses/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Course ID")),
    request_body = CourseInput,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<CourseInput>,
) -> ApiResult<Course> {
    Ok(Json(state.catalog.update_course(CourseId(id), input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/courses/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course, its subjects and its timetable deleted", body = Course),
        (status = 404, description = "Unknown course", body = ErrorBody)
    )
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Course> {
    Ok(Json(state.catalog.delete_course(&CourseId(id)).await?))
}

// subjects

#[utoipa::path(
    get,
    path = "/v1/subjects",
    tag = "catalog",
    responses((status = 200, description = "All subjects", body = [Subject]))
)]
pub async fn list_subjects(State(state): State<AppState>) -> ApiResult<Vec<Subject>> {
    Ok(Json(state.catalog.subjects().await?))
}

#[utoipa::path(
    post,
    path = "/v1/subjects",
    tag = "catalog",
    request_body = SubjectInput,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 400, description = "Invalid or duplicate subject", body = ErrorBody)
    )
)]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(input): Json<SubjectInput>,
) -> Created<Subject> {
    Ok(created(state.catalog.create_subject(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/subjects/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Subject ID")),
    request_body = SubjectInput,
    responses(
        (status = 200, description = "Subject updated", body = Subject),
        (status = 404, description = "Unknown subject", body = ErrorBody)
    )
)]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SubjectInput>,
) -> ApiResult<Subject> {
    Ok(Json(state.catalog.update_subject(SubjectId(id), input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/subjects/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Subject ID")),
    responses(
        (status = 200, description = "Subject deleted and removed from teachers and timetable", body = Subject),
        (status = 404, description = "Unknown subject", body = ErrorBody)
    )
)]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Subject> {
    Ok(Json(state.catalog.delete_subject(&SubjectId(id)).await?))
}

// classrooms

#[utoipa::path(
    get,
    path = "/v1/classrooms",
    tag = "catalog",
    responses((status = 200, description = "All classrooms", body = [Classroom]))
)]
pub async fn list_classrooms(State(state): State<AppState>) -> ApiResult<Vec<Classroom>> {
    Ok(Json(state.catalog.classrooms().await?))
}

#[utoipa::path(
    post,
    path = "/v1/classrooms",
    tag = "catalog",
    request_body = ClassroomInput,
    responses(
        (status = 201, description = "Classroom created", body = Classroom),
        (status = 400, description = "Invalid or duplicate classroom", body = ErrorBody)
    )
)]
pub async fn create_classroom(
    State(state): State<AppState>,
    Json(input): Json<ClassroomInput>,
) -> Created<Classroom> {
    Ok(created(state.catalog.create_classroom(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/classrooms/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Classroom ID")),
    request_body = ClassroomInput,
    responses(
        (status = 200, description = "Classroom updated", body = Classroom),
        (status = 404, description = "Unknown classroom", body = ErrorBody)
    )
)]
pub async fn update_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ClassroomInput>,
) -> ApiResult<Classroom> {
    Ok(Json(state.catalog.update_classroom(ClassroomId(id), input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/classrooms/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Classroom ID")),
    responses(
        (status = 200, description = "Classroom and its lessons deleted", body = Classroom),
        (status = 404, description = "Unknown classroom", body = ErrorBody)
    )
)]
pub async fn delete_classroom(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Classroom> {
    Ok(Json(state.catalog.delete_classroom(&ClassroomId(id)).await?))
}

// constraints

#[utoipa::path(
    get,
    path = "/v1/constraints",
    tag = "catalog",
    responses((status = 200, description = "All constraints", body = [Constraint]))
)]
pub async fn list_constraints(State(state): State<AppState>) -> ApiResult<Vec<Constraint>> {
    Ok(Json(state.catalog.constraints().await?))
}

#[utoipa::path(
    post,
    path = "/v1/constraints",
    tag = "catalog",
    request_body = ConstraintInput,
    responses(
        (status = 201, description = "Constraint created", body = Constraint),
        (status = 400, description = "Invalid constraint", body = ErrorBody)
    )
)]
pub async fn create_constraint(
    State(state): State<AppState>,
    Json(input): Json<ConstraintInput>,
) -> Created<Constraint> {
    Ok(created(state.catalog.create_constraint(input).await?))
}

#[utoipa::path(
    put,
    path = "/v1/constraints/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Constraint ID")),
    request_body = ConstraintInput,
    responses(
        (status = 200, description = "Constraint updated", body = Constraint),
        (status = 404, description = "Unknown constraint", body = ErrorBody)
    )
)]
pub async fn update_constraint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ConstraintInput>,
) -> ApiResult<Constraint> {
    Ok(Json(state.catalog.update_constraint(ConstraintId(id), input).await?))
}

#[utoipa::path(
    delete,
    path = "/v1/constraints/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Constraint ID")),
    responses(
        (status = 200, description = "Constraint deleted", body = Constraint),
        (status = 404, description = "Unknown constraint", body = ErrorBody)
    )
)]
pub async fn delete_constraint(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Constraint> {
    Ok(Json(state.catalog.delete_constraint(&ConstraintId(id)).await?))
}
