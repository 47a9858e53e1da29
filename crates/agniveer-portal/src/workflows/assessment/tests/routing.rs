use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::assessment::domain::TestStatus;
use crate::workflows::assessment::repository::AssessmentRepository;
use crate::workflows::assessment::router::stats_handler;
use crate::workflows::assessment::{assessment_router, AssessmentService};

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn schedule_route_applies_default_marks() {
    let (service, _) = build_service();
    let router = assessment_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/training/tests",
            serde_json::json!({
                "name": "Weapon drill",
                "test_type": "WEAPONS",
                "scheduled_date": "2024-05-02T08:00:00",
                "target_type": "COMPANY",
                "target_value": "Alpha"
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "SCHEDULED");
    assert_eq!(payload["max_marks"], 100.0);
    assert_eq!(payload["passing_marks"], 50.0);
    assert_eq!(payload["results_count"], 0);
}

#[tokio::test]
async fn schedule_route_rejects_invalid_marks() {
    let (service, _) = build_service();
    let router = assessment_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/training/tests",
            serde_json::json!({
                "name": "Weapon drill",
                "test_type": "WEAPONS",
                "scheduled_date": "2024-05-02T08:00:00",
                "target_type": "ALL",
                "max_marks": 20,
                "passing_marks": 25
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn result_route_labels_saved_result() {
    let (service, repository) = build_service();
    repository
        .insert_test(scheduled(931, TestStatus::Completed))
        .expect("insert succeeds");
    let router = assessment_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            "/api/v1/training/tests/931/results",
            serde_json::json!({ "recruit_id": 2, "score": 30 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["label"], "PASS");
    assert_eq!(payload["result"]["has_result"], true);

    let roster = router
        .oneshot(get("/api/v1/training/tests/931/roster"))
        .await
        .expect("route executes");
    assert_eq!(roster.status(), StatusCode::OK);
    let payload = read_json_body(roster).await;
    assert_eq!(payload["summary"]["pass"], 1);
    assert_eq!(payload["summary"]["pending"], 2);
    assert_eq!(payload["test"]["results_count"], 1);
}

#[tokio::test]
async fn result_route_reports_closed_tests_as_conflict() {
    let (service, repository) = build_service();
    repository
        .insert_test(scheduled(932, TestStatus::InProgress))
        .expect("insert succeeds");
    let router = assessment_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/training/tests/932/results",
            serde_json::json!({ "recruit_id": 1, "is_absent": true }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn result_route_returns_rejection_for_out_of_range_score() {
    let (service, repository) = build_service();
    repository
        .insert_test(scheduled(933, TestStatus::Scheduled))
        .expect("insert succeeds");
    let router = assessment_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "/api/v1/training/tests/933/results",
            serde_json::json!({ "recruit_id": 1, "score": 51 }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["rejection"]["kind"], "out_of_range_score");
}

#[tokio::test]
async fn roster_route_returns_not_found_for_unknown_test() {
    let (service, _) = build_service();
    let router = assessment_router(Arc::new(service));

    let response = router
        .oneshot(get("/api/v1/training/tests/4040/roster"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entry_queue_and_stats_routes_report_calendar() {
    let (service, repository) = build_service();
    repository
        .insert_test(scheduled(941, TestStatus::Scheduled))
        .expect("insert succeeds");
    repository
        .insert_test(scheduled(942, TestStatus::Cancelled))
        .expect("insert succeeds");
    let router = assessment_router(Arc::new(service));

    let queue = router
        .clone()
        .oneshot(get("/api/v1/training/entry-queue"))
        .await
        .expect("route executes");
    let payload = read_json_body(queue).await;
    assert_eq!(payload.as_array().map(Vec::len), Some(1));
    assert_eq!(payload[0]["id"], 941);

    let stats = router
        .oneshot(get("/api/v1/training/stats"))
        .await
        .expect("route executes");
    let payload = read_json_body(stats).await;
    assert_eq!(payload["total"], 2);
    assert_eq!(payload["upcoming"], 1);
    assert_eq!(payload["pending_entry"], 1);
}

#[tokio::test]
async fn stats_handler_maps_repository_failure_to_internal_error() {
    let service = Arc::new(AssessmentService::new(Arc::new(UnavailableRepository)));
    let response = stats_handler::<UnavailableRepository>(State(service)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
