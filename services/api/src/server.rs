use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryFleetStore, InMemorySimulationHistory};
use crate::routes::with_fleet_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use greencart::config::AppConfig;
use greencart::error::AppError;
use greencart::ingest::FleetDataset;
use greencart::simulation::{KpiRules, SimulationService};
use greencart::telemetry;
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
    if let Some(dir) = args.data_dir.take() {
        config.data.dir = Some(dir);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dataset = match &config.data.dir {
        Some(dir) => FleetDataset::from_dir(dir)?,
        None => FleetDataset::default(),
    };
    let fleet = InMemoryFleetStore::from_dataset(dataset);
    let history = Arc::new(InMemorySimulationHistory::default());
    let simulation_service = Arc::new(SimulationService::new(
        Arc::new(fleet.clone()),
        history,
        KpiRules::default(),
    ));

    let app = with_fleet_routes(simulation_service, fleet, config.environment)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "greencart fleet service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
