use crate::cli::ServeArgs;
use crate::infra::{
    load_engine, seed_profiles, AppState, InMemoryNotificationPublisher,
    InMemoryProfileRepository,
};
use crate::routes::with_rewards_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use deal_rewards::config::AppConfig;
use deal_rewards::error::AppError;
use deal_rewards::profiles::RewardsService;
use deal_rewards::telemetry;
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
    };

    let engine = Arc::new(load_engine(&config.rewards)?);
    let rewards_service = Arc::new(RewardsService::new(
        engine.clone(),
        Arc::new(InMemoryProfileRepository::default()),
        Arc::new(InMemoryNotificationPublisher::default()),
    ));
    let seeded = seed_profiles(&rewards_service)?;
    info!(seeded, "seeded community profiles");

    let app = with_rewards_routes(engine, rewards_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "deal rewards service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
