use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::TestId;
use super::lifecycle::ResultEntry;
use super::repository::AssessmentRepository;
use super::schedule::TestDraft;
use super::service::{AssessmentService, AssessmentServiceError};
use crate::workflows::repository::RepositoryError;

/// Router builder exposing scheduling, dashboard counters, rosters, and result entry.
pub fn assessment_router<R>(service: Arc<AssessmentService<R>>) -> Router
where
    R: AssessmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/training/tests",
            get(list_handler::<R>).post(schedule_handler::<R>),
        )
        .route("/api/v1/training/entry-queue", get(entry_queue_handler::<R>))
        .route("/api/v1/training/stats", get(stats_handler::<R>))
        .route(
            "/api/v1/training/tests/:test_id/roster",
            get(roster_handler::<R>),
        )
        .route(
            "/api/v1/training/tests/:test_id/results",
            post(result_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.tests() {
        Ok(tests) => (StatusCode::OK, axum::Json(tests)).into_response(),
        Err(error) => error_response(error),
    }
}

/// Tests an officer may pick for result entry.
pub(crate) async fn entry_queue_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.entry_candidates() {
        Ok(tests) => (StatusCode::OK, axum::Json(tests)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn schedule_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    axum::Json(draft): axum::Json<TestDraft>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.schedule(draft) {
        Ok(test) => (StatusCode::CREATED, axum::Json(test)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R>(State(service): State<Arc<AssessmentService<R>>>) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(test_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.roster(TestId(test_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn result_handler<R>(
    State(service): State<Arc<AssessmentService<R>>>,
    Path(test_id): Path<u64>,
    axum::Json(entry): axum::Json<ResultEntry>,
) -> Response
where
    R: AssessmentRepository + 'static,
{
    match service.record_result(TestId(test_id), entry) {
        Ok(result) => (StatusCode::OK, axum::Json(result)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: AssessmentServiceError) -> Response {
    let status = match &error {
        AssessmentServiceError::Rejected(_) | AssessmentServiceError::Schedule(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AssessmentServiceError::EntryClosed { .. } | AssessmentServiceError::NotOnRoster { .. } => {
            StatusCode::CONFLICT
        }
        AssessmentServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &error {
        AssessmentServiceError::Rejected(rejection) => json!({
            "error": error.to_string(),
            "rejection": rejection,
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, axum::Json(payload)).into_response()
}
