use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::json;

use super::accounting::LeaveBalance;
use super::domain::{LeaveApplication, LeaveRequest};
use super::repository::LeaveRepository;
use super::service::{LeaveService, LeaveServiceError};
use crate::workflows::RecruitId;

/// Leave history alongside the balance derived from it.
#[derive(Debug, Serialize)]
pub struct LeaveOverview {
    pub recruit_id: RecruitId,
    pub balance: LeaveBalance,
    pub requests: Vec<LeaveRequest>,
}

/// Router builder exposing leave balance, dry-run checks, and applications.
pub fn leave_router<R>(service: Arc<LeaveService<R>>) -> Router
where
    R: LeaveRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/recruits/:recruit_id/leave",
            get(overview_handler::<R>).post(apply_handler::<R>),
        )
        .route(
            "/api/v1/recruits/:recruit_id/leave/check",
            post(check_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn overview_handler<R>(
    State(service): State<Arc<LeaveService<R>>>,
    Path(recruit_id): Path<u64>,
) -> Response
where
    R: LeaveRepository + 'static,
{
    let recruit_id = RecruitId(recruit_id);
    match service.history(recruit_id) {
        Ok(requests) => {
            let overview = LeaveOverview {
                recruit_id,
                balance: service.policy().balance(&requests),
                requests,
            };
            (StatusCode::OK, axum::Json(overview)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn check_handler<R>(
    State(service): State<Arc<LeaveService<R>>>,
    Path(recruit_id): Path<u64>,
    axum::Json(application): axum::Json<LeaveApplication>,
) -> Response
where
    R: LeaveRepository + 'static,
{
    match service.check(RecruitId(recruit_id), &application) {
        Ok(accepted) => (StatusCode::OK, axum::Json(accepted)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R>(
    State(service): State<Arc<LeaveService<R>>>,
    Path(recruit_id): Path<u64>,
    axum::Json(application): axum::Json<LeaveApplication>,
) -> Response
where
    R: LeaveRepository + 'static,
{
    match service.apply(RecruitId(recruit_id), application) {
        Ok(request) => (StatusCode::CREATED, axum::Json(request)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: LeaveServiceError) -> Response {
    match error {
        LeaveServiceError::Rejected(rejection) => {
            let payload = json!({
                "error": rejection.to_string(),
                "rejection": rejection,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        LeaveServiceError::Repository(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
