use axum::{extract::State, Json};
use types::{GenerateRequest, GenerateResponse, ReportData};

use crate::error::{ApiResult, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/v1/generate-schedule",
    tag = "generation",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Timetable replaced", body = GenerateResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "A lesson could not be placed; nothing was written", body = ErrorBody)
    )
)]
pub async fn generate_schedule(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<GenerateResponse> {
    tracing::info!(
        course = %req.course,
        year = req.year,
        optimization_type = %req.optimization_type,
        respect_preferences = req.respect_preferences,
        "generation requested"
    );
    let generated = state.scheduler.generate(&req).await?;
    Ok(Json(GenerateResponse {
        success: true,
        message: generated.message(),
        lessons: generated.entries.len(),
    }))
}

#[utoipa::path(
    get,
    path = "/v1/report-data",
    tag = "generation",
    responses((status = 200, description = "Metrics, trends, classroom usage and teacher workload", body = ReportData))
)]
pub async fn report_data(State(state): State<AppState>) -> ApiResult<ReportData> {
    Ok(Json(state.scheduler.report_data().await?))
}
