mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod catalog;
    pub mod generate;
    pub mod health;
    pub mod notifications;
    pub mod schedule;
    pub mod teachers;
}

use axum::{
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::generate::generate_schedule,
            routes::generate::report_data,
            routes::catalog::list_courses,
            routes::catalog::create_course,
            routes::catalog::update_course,
            routes::catalog::delete_course,
            routes::catalog::list_subjects,
            routes::catalog::create_subject,
            routes::catalog::update_subject,
            routes::catalog::delete_subject,
            routes::catalog::list_classrooms,
            routes::catalog::create_classroom,
            routes::catalog::update_classroom,
            routes::catalog::delete_classroom,
            routes::catalog::list_constraints,
            routes::catalog::create_constraint,
            routes::catalog::update_constraint,
            routes::catalog::delete_constraint,
            routes::teachers::list_teachers,
            routes::teachers::create_teacher,
            routes::teachers::update_teacher,
            routes::teachers::delete_teacher,
            routes::teachers::list_preferences,
            routes::teachers::create_preference,
            routes::teachers::delete_preference,
            routes::schedule::list_schedule,
            routes::schedule::get_entry,
            routes::schedule::create_entry,
            routes::schedule::update_entry,
            routes::schedule::delete_entry,
            routes::schedule::set_status,
            routes::notifications::list_for_user,
            routes::notifications::mark_all_read,
            routes::notifications::delete_for_user,
            routes::notifications::mark_read,
            routes::notifications::delete_one,
        ),
        components(schemas(
            types::Course, types::CourseInput, types::Subject, types::SubjectInput,
            types::Classroom, types::ClassroomInput, types::Teacher, types::TeacherInput,
            types::SubjectList, types::Constraint, types::ConstraintInput, types::ConstraintKind,
            types::Preference, types::PreferenceInput, types::PreferenceKind,
            types::ScheduleEntry, types::EntryInput, types::EntryPatch, types::EntryStatus,
            types::Day, types::TimeSlot, types::Notification, types::Severity, types::RefModel,
            types::Role, types::GenerateRequest, types::GenerateResponse, types::ReportData,
            types::ReportMetrics, types::Trends, types::ClassroomUsage, types::TeacherWorkload,
            types::WorkloadStatus, types::CourseId, types::SubjectId, types::ClassroomId,
            types::TeacherId, types::ConstraintId, types::PreferenceId, types::EntryId,
            types::UserId, types::NotificationId,
            error::ErrorBody,
            routes::schedule::StatusUpdate,
            routes::notifications::Affected
        )),
        tags(
            (name = "generation", description = "Timetable generation and reporting"),
            (name = "catalog", description = "Courses, subjects, classrooms and constraints"),
            (name = "teachers", description = "Teachers and their slot preferences"),
            (name = "schedule", description = "Timetable entries"),
            (name = "notifications", description = "Per-user notifications"),
            (name = "system", description = "Service health")
        )
    )]
struct ApiDoc;

fn app(state: AppState) -> Router {
    use routes::{catalog, generate, health, notifications, schedule, teachers};

    Router::new()
        .route("/v1/health", get(health::health))
        .route("/v1/generate-schedule", post(generate::generate_schedule))
        .route("/v1/report-data", get(generate::report_data))
        .route("/v1/courses", get(catalog::list_courses).post(catalog::create_course))
        .route("/v1/courses/:id", put(catalog::update_course).delete(catalog::delete_course))
        .route("/v1/subjects", get(catalog::list_subjects).post(catalog::create_subject))
        .route("/v1/subjects/:id", put(catalog::update_subject).delete(catalog::delete_subject))
        .route("/v1/classrooms", get(catalog::list_classrooms).post(catalog::create_classroom))
        .route(
            "/v1/classrooms/:id",
            put(catalog::update_classroom).delete(catalog::delete_classroom),
        )
        .route("/v1/constraints", get(catalog::list_constraints).post(catalog::create_constraint))
        .route(
            "/v1/constraints/:id",
            put(catalog::update_constraint).delete(catalog::delete_constraint),
        )
        .route("/v1/teachers", get(teachers::list_teachers).post(teachers::create_teacher))
        .route("/v1/teachers/:id", put(teachers::update_teacher).delete(teachers::delete_teacher))
        .route("/v1/teachers/:id/preferences", get(teachers::list_preferences))
        .route("/v1/preferences", post(teachers::create_preference))
        .route("/v1/preferences/:id", axum::routing::delete(teachers::delete_preference))
        .route("/v1/schedule", get(schedule::list_schedule).post(schedule::create_entry))
        .route(
            "/v1/schedule/:id",
            get(schedule::get_entry)
                .put(schedule::update_entry)
                .delete(schedule::delete_entry),
        )
        .route("/v1/schedule/:id/status", put(schedule::set_status))
        .route(
            "/v1/users/:id/notifications",
            get(notifications::list_for_user).delete(notifications::delete_for_user),
        )
        .route("/v1/users/:id/notifications/read", put(notifications::mark_all_read))
        .route("/v1/notifications/:id", axum::routing::delete(notifications::delete_one))
        .route("/v1/notifications/:id/read", put(notifications::mark_read))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = config::AppConfig::from_env()?;
    telemetry::init(cfg.log_format);

    let addr = cfg.listen_addr()?;
    let app = telemetry::layered(app(AppState::from_config(&cfg)));
    tracing::info!(%addr, seed_demo_data = cfg.seed_demo_data, seeded_rng = cfg.rng_seed.is_some(), "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}
