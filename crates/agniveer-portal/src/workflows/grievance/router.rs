use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{GrievanceDraft, GrievanceId};
use super::repository::GrievanceRepository;
use super::service::{GrievanceService, GrievanceServiceError};
use crate::workflows::repository::RepositoryError;
use crate::workflows::RecruitId;

#[derive(Debug, Deserialize)]
pub struct ResolutionPayload {
    pub notes: String,
}

pub fn grievance_router<R>(service: Arc<GrievanceService<R>>) -> Router
where
    R: GrievanceRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/recruits/:recruit_id/grievances",
            get(list_handler::<R>).post(file_handler::<R>),
        )
        .route(
            "/api/v1/recruits/:recruit_id/grievances/:grievance_id/resolve",
            post(resolve_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<GrievanceService<R>>>,
    Path(recruit_id): Path<u64>,
) -> Response
where
    R: GrievanceRepository + 'static,
{
    match service.list(RecruitId(recruit_id)) {
        Ok(grievances) => (StatusCode::OK, axum::Json(grievances)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn file_handler<R>(
    State(service): State<Arc<GrievanceService<R>>>,
    Path(recruit_id): Path<u64>,
    axum::Json(draft): axum::Json<GrievanceDraft>,
) -> Response
where
    R: GrievanceRepository + 'static,
{
    match service.file(RecruitId(recruit_id), draft) {
        Ok(grievance) => (StatusCode::CREATED, axum::Json(grievance)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_handler<R>(
    State(service): State<Arc<GrievanceService<R>>>,
    Path((recruit_id, grievance_id)): Path<(u64, u64)>,
    axum::Json(payload): axum::Json<ResolutionPayload>,
) -> Response
where
    R: GrievanceRepository + 'static,
{
    match service.resolve(
        RecruitId(recruit_id),
        GrievanceId(grievance_id),
        &payload.notes,
    ) {
        Ok(grievance) => (StatusCode::OK, axum::Json(grievance)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: GrievanceServiceError) -> Response {
    let status = match &error {
        GrievanceServiceError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GrievanceServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        GrievanceServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": error.to_string() }))).into_response()
}
