use crate::cli::ServeArgs;
use crate::infra::{
    sample_recruits, AppState, InMemoryGrievanceBook, InMemoryLeaveBook, InMemoryTrainingBook,
};
use crate::routes::with_portal_routes;
use agniveer_portal::config::AppConfig;
use agniveer_portal::error::AppError;
use agniveer_portal::telemetry;
use agniveer_portal::workflows::assessment::AssessmentService;
use agniveer_portal::workflows::grievance::GrievanceService;
use agniveer_portal::workflows::leave::LeaveService;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        policy: config.leave,
    };

    let leave_service = Arc::new(LeaveService::new(
        Arc::new(InMemoryLeaveBook::default()),
        config.leave,
    ));
    let assessment_service = Arc::new(AssessmentService::new(Arc::new(
        InMemoryTrainingBook::new(sample_recruits()),
    )));
    let grievance_service = Arc::new(GrievanceService::new(Arc::new(
        InMemoryGrievanceBook::default(),
    )));

    let app = with_portal_routes(leave_service, assessment_service, grievance_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        entitlement = config.leave.annual_entitlement,
        "agniveer portal ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
