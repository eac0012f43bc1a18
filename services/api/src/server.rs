use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryLoanApplicationRepository, InMemoryWorkflowNotifier,
    StaticTokenIdentityProvider,
};
use crate::routes::with_lending_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use sme_lending::config::AppConfig;
use sme_lending::error::AppError;
use sme_lending::telemetry;
use sme_lending::workflows::loan_application::LoanApplicationService;
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

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let identity = Arc::new(StaticTokenIdentityProvider::from_config(&config.identity));
    if identity.is_empty() {
        warn!("APP_API_TOKENS is empty; loan application routes will reject every request");
    }

    let repository = Arc::new(InMemoryLoanApplicationRepository::default());
    let notifier = Arc::new(InMemoryWorkflowNotifier::default());
    let service = Arc::new(LoanApplicationService::new(repository, notifier));

    let app = with_lending_routes(service, identity)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "sme lending back office ready");

    axum::serve(listener, app).await?;
    Ok(())
}
