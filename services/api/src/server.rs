use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryPlanRepository};
use crate::routes::with_planner_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use idea_planner::config::AppConfig;
use idea_planner::error::AppError;
use idea_planner::telemetry;
use idea_planner::workflows::planner::{HttpGenerationClient, PlanSynthesisService};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    if config.generation.api_key.is_none() {
        warn!("CLAUDE_API_KEY is not set; plan generation requests will fail");
    }

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let generator = Arc::new(HttpGenerationClient::new(config.generation.clone())?);
    let repository = Arc::new(InMemoryPlanRepository::default());
    let planner_service = Arc::new(
        PlanSynthesisService::new(generator, repository, config.links.clone())
            .with_retention(config.report_retention),
    );

    let app = with_planner_routes(planner_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, model = %config.generation.model, "idea planner ready");

    axum::serve(listener, app).await?;
    Ok(())
}
