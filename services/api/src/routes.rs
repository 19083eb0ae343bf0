use crate::infra::{AppState, InMemoryFleetStore};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use greencart::config::AppEnvironment;
use greencart::error::AppError;
use greencart::fleet::OrderSnapshot;
use greencart::ingest::FleetDataset;
use greencart::simulation::{
    simulation_router, OrderStore, RepositoryError, ResultStore, SimulationService,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FleetImportRequest {
    pub(crate) routes_csv: String,
    pub(crate) drivers_csv: String,
    pub(crate) orders_csv: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FleetImportResponse {
    pub(crate) routes: usize,
    pub(crate) drivers: usize,
    pub(crate) orders: usize,
}

pub(crate) fn with_fleet_routes<S>(
    service: Arc<SimulationService<InMemoryFleetStore, S>>,
    fleet: InMemoryFleetStore,
    environment: AppEnvironment,
) -> axum::Router
where
    S: ResultStore + 'static,
{
    simulation_router(service, environment)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/routes", axum::routing::get(list_routes))
        .route("/api/drivers", axum::routing::get(list_drivers))
        .route("/api/orders", axum::routing::get(list_orders))
        .route("/api/fleet/import", axum::routing::post(import_fleet))
        .layer(Extension(fleet))
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

pub(crate) async fn list_routes(Extension(fleet): Extension<InMemoryFleetStore>) -> Response {
    listing(fleet.routes(), "Server error fetching routes")
}

pub(crate) async fn list_drivers(Extension(fleet): Extension<InMemoryFleetStore>) -> Response {
    listing(fleet.drivers(), "Server error fetching drivers")
}

pub(crate) async fn list_orders(Extension(fleet): Extension<InMemoryFleetStore>) -> Response {
    let orders: Result<Vec<OrderSnapshot>, RepositoryError> = fleet.find_all();
    listing(orders, "Server error fetching orders")
}

fn listing<T: Serialize>(items: Result<Vec<T>, RepositoryError>, failure: &str) -> Response {
    match items {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "{}", failure);
            let payload = json!({ "message": failure });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

/// Replace the in-memory fleet with freshly uploaded CSV exports.
pub(crate) async fn import_fleet(
    Extension(fleet): Extension<InMemoryFleetStore>,
    Json(payload): Json<FleetImportRequest>,
) -> Response {
    let FleetImportRequest {
        routes_csv,
        drivers_csv,
        orders_csv,
    } = payload;

    let dataset = match FleetDataset::from_readers(
        Cursor::new(routes_csv.into_bytes()),
        Cursor::new(drivers_csv.into_bytes()),
        Cursor::new(orders_csv.into_bytes()),
    ) {
        Ok(dataset) => dataset,
        Err(err) => return AppError::from(err).into_response(),
    };
    let counts = FleetImportResponse {
        routes: dataset.routes.len(),
        drivers: dataset.drivers.len(),
        orders: dataset.orders.len(),
    };

    if let Err(err) = fleet.replace(dataset) {
        tracing::error!(error = %err, "failed to replace fleet data");
        let payload = json!({ "message": "Server error importing fleet data" });
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response();
    }
    info!(
        routes = counts.routes,
        drivers = counts.drivers,
        orders = counts.orders,
        "fleet data replaced"
    );

    (StatusCode::OK, Json(counts)).into_response()
}
