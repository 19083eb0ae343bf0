use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::config::AppEnvironment;
use crate::fleet::{OrderId, OrderSnapshot, Route, RouteId, TrafficLevel};
use crate::simulation::repository::{
    NewSimulationResult, OrderStore, RepositoryError, ResultStore, SimulationId,
    SimulationRecord,
};
use crate::simulation::{simulation_router, KpiRules, RunRequest, SimulationService};

pub(super) fn route(id: &str, distance_in_km: f64, traffic_level: TrafficLevel, base_time: f64) -> Route {
    Route {
        route_id: RouteId(id.to_string()),
        distance_in_km,
        traffic_level,
        base_time,
    }
}

pub(super) fn order(id: &str, value_rs: f64, route: Option<&Route>, minutes: f64) -> OrderSnapshot {
    OrderSnapshot {
        order_id: OrderId(id.to_string()),
        value_rs,
        assigned_route: route.cloned(),
        actual_delivery_duration_minutes: minutes,
    }
}

pub(super) fn low_route() -> Route {
    route("1", 10.0, TrafficLevel::Low, 30.0)
}

pub(super) fn high_route() -> Route {
    route("2", 20.0, TrafficLevel::High, 60.0)
}

pub(super) fn medium_route() -> Route {
    route("3", 5.0, TrafficLevel::Medium, 20.0)
}

/// On-time low value, late high value on heavy traffic, on-time medium traffic.
pub(super) fn mixed_orders() -> Vec<OrderSnapshot> {
    vec![
        order("o1", 500.0, Some(&low_route()), 25.0),
        order("o2", 1500.0, Some(&high_route()), 95.0),
        order("o3", 800.0, Some(&medium_route()), 15.0),
    ]
}

pub(super) fn request() -> RunRequest {
    RunRequest::new(2, "09:00", 10.0)
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

#[derive(Default, Clone)]
pub(super) struct MemoryOrders {
    orders: Arc<Mutex<Vec<OrderSnapshot>>>,
}

impl MemoryOrders {
    pub(super) fn with(orders: Vec<OrderSnapshot>) -> Self {
        Self {
            orders: Arc::new(Mutex::new(orders)),
        }
    }
}

impl OrderStore for MemoryOrders {
    fn find_all(&self) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        Ok(self.orders.lock().expect("orders mutex poisoned").clone())
    }
}

pub(super) struct UnavailableOrders;

impl OrderStore for UnavailableOrders {
    fn find_all(&self) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        Err(RepositoryError::Unavailable("order store offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryResults {
    records: Arc<Mutex<Vec<SimulationRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl MemoryResults {
    pub(super) fn saved(&self) -> Vec<SimulationRecord> {
        self.records.lock().expect("results mutex poisoned").clone()
    }
}

impl ResultStore for MemoryResults {
    fn save(&self, result: NewSimulationResult) -> Result<SimulationRecord, RepositoryError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let base = Utc
            .with_ymd_and_hms(2025, 8, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let record = SimulationRecord::from_new(
            SimulationId(format!("sim-{seq}")),
            base + Duration::minutes(seq as i64),
            result,
        );
        self.records
            .lock()
            .expect("results mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<SimulationRecord>, RepositoryError> {
        let mut records = self.saved();
        records.reverse();
        records.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        Ok(records)
    }
}

pub(super) struct FailingResults;

impl ResultStore for FailingResults {
    fn save(&self, _result: NewSimulationResult) -> Result<SimulationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn list_all(&self) -> Result<Vec<SimulationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

pub(super) fn build_service(
    orders: Vec<OrderSnapshot>,
) -> (
    SimulationService<MemoryOrders, MemoryResults>,
    MemoryResults,
) {
    let results = MemoryResults::default();
    let service = SimulationService::new(
        Arc::new(MemoryOrders::with(orders)),
        Arc::new(results.clone()),
        KpiRules::default(),
    );
    (service, results)
}

pub(super) fn router_with_service<O, S>(
    service: SimulationService<O, S>,
    environment: AppEnvironment,
) -> axum::Router
where
    O: OrderStore + 'static,
    S: ResultStore + 'static,
{
    simulation_router(Arc::new(service), environment)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
