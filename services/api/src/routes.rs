use crate::infra::{deserialize_date, AppState};
use agniveer_portal::error::AppError;
use agniveer_portal::workflows::assessment::{
    assessment_router, AssessmentRepository, AssessmentService,
};
use agniveer_portal::workflows::grievance::{
    grievance_router, GrievanceRepository, GrievanceService,
};
use agniveer_portal::workflows::import::LeaveHistoryImporter;
use agniveer_portal::workflows::leave::{
    leave_router, AcceptedApplication, LeaveBalance, LeavePolicy, LeaveRepository, LeaveRequest,
    LeaveService, LeaveSpan,
};
use agniveer_portal::workflows::validation::ValidationError;
use agniveer_portal::workflows::RecruitId;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Ad-hoc balance check against an exported leave history.
#[derive(Debug, Deserialize)]
pub(crate) struct LeaveEvaluationRequest {
    #[serde(default)]
    pub(crate) recruit_id: u64,
    pub(crate) history_csv: String,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) start_date: NaiveDate,
    #[serde(deserialize_with = "deserialize_date")]
    pub(crate) end_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum LeaveDecision {
    Accepted,
    Rejected,
}

#[derive(Debug, Serialize)]
pub(crate) struct LeaveEvaluation {
    pub(crate) balance: LeaveBalance,
    pub(crate) latest_end_date: Option<NaiveDate>,
    pub(crate) decision: LeaveDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) accepted: Option<AcceptedApplication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) rejection: Option<ValidationError>,
}

pub(crate) fn evaluate_leave(
    policy: &LeavePolicy,
    history: &[LeaveRequest],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LeaveEvaluation {
    let outcome = LeaveSpan::new(start_date, end_date)
        .and_then(|span| policy.validate_application(history, &span));
    let (decision, accepted, rejection) = match outcome {
        Ok(accepted) => (LeaveDecision::Accepted, Some(accepted), None),
        Err(rejection) => (LeaveDecision::Rejected, None, Some(rejection)),
    };

    LeaveEvaluation {
        balance: policy.balance(history),
        latest_end_date: policy.latest_end_date(start_date, history),
        decision,
        accepted,
        rejection,
    }
}

pub(crate) fn with_portal_routes<L, A, G>(
    leave: Arc<LeaveService<L>>,
    assessment: Arc<AssessmentService<A>>,
    grievance: Arc<GrievanceService<G>>,
) -> axum::Router
where
    L: LeaveRepository + 'static,
    A: AssessmentRepository + 'static,
    G: GrievanceRepository + 'static,
{
    leave_router(leave)
        .merge(assessment_router(assessment))
        .merge(grievance_router(grievance))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/leave/evaluate",
            axum::routing::post(leave_evaluation_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn leave_evaluation_endpoint(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LeaveEvaluationRequest>,
) -> Result<Json<LeaveEvaluation>, AppError> {
    let LeaveEvaluationRequest {
        recruit_id,
        history_csv,
        start_date,
        end_date,
    } = payload;

    let reader = Cursor::new(history_csv.into_bytes());
    let history = LeaveHistoryImporter::from_reader(reader, RecruitId(recruit_id))?;

    Ok(Json(evaluate_leave(
        &state.policy,
        &history,
        start_date,
        end_date,
    )))
}
