use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::AppEnvironment;
use crate::simulation::router::{run_handler, SimulationState, RUN_COMPLETED_MESSAGE};
use crate::simulation::{KpiRules, RunRequest, SimulationService};

fn post_simulation(body: Value) -> Request<Body> {
    Request::post("/api/simulation")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn run_route_returns_kpis_and_simulation_id() {
    let (service, results) = build_service(mixed_orders());
    let router = router_with_service(service, AppEnvironment::Test);

    let response = router
        .oneshot(post_simulation(json!({
            "numberOfDrivers": 2,
            "routeStartTime": "09:00",
            "maxHoursPerDay": 10
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["totalProfit"], json!(2535.0));
    assert_eq!(payload["onTimeDeliveries"], json!(2));
    assert_eq!(payload["totalDeliveries"], json!(3));
    assert_eq!(payload["totalFuelCost"], json!(215.0));
    assert_eq!(payload["simulationId"], json!("sim-1"));
    assert_eq!(payload["message"], json!(RUN_COMPLETED_MESSAGE));
    let efficiency = payload["efficiencyScore"].as_f64().expect("efficiency number");
    assert!((efficiency - 66.67).abs() < 0.01);
    assert_eq!(results.saved().len(), 1);
}

#[tokio::test]
async fn run_route_reports_missing_fields() {
    let (service, results) = build_service(mixed_orders());
    let router = router_with_service(service, AppEnvironment::Test);

    let response = router
        .oneshot(post_simulation(json!({ "numberOfDrivers": 5, "maxHoursPerDay": 8 })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Please provide numberOfDrivers, routeStartTime, and maxHoursPerDay.")
    );
    assert_eq!(payload["fields"], json!(["routeStartTime"]));
    assert!(results.saved().is_empty());
}

#[tokio::test]
async fn run_handler_rejects_non_positive_values() {
    let (service, _) = build_service(mixed_orders());
    let state = SimulationState {
        service: Arc::new(service),
        expose_error_detail: true,
    };

    let response = run_handler(State(state), Ok(Json(RunRequest::new(0, "08:00", 8.0)))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Number of drivers and max hours per day must be positive.")
    );
    assert_eq!(payload["fields"], json!(["numberOfDrivers"]));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (service, _) = build_service(mixed_orders());
    let router = router_with_service(service, AppEnvironment::Test);

    let response = router
        .oneshot(post_simulation(json!({ "numberOfDrivers": "five" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload["message"].is_string());
}

#[tokio::test]
async fn persistence_failure_is_a_server_error_with_detail_outside_production() {
    let service = SimulationService::new(
        Arc::new(MemoryOrders::with(mixed_orders())),
        Arc::new(FailingResults),
        KpiRules::default(),
    );
    let router = router_with_service(service, AppEnvironment::Development);

    let response = router
        .oneshot(post_simulation(json!({
            "numberOfDrivers": 1,
            "routeStartTime": "08:00",
            "maxHoursPerDay": 8
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Simulation completed but results could not be saved.")
    );
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("disk full"));
}

#[tokio::test]
async fn production_hides_failure_detail() {
    let service = SimulationService::new(
        Arc::new(UnavailableOrders),
        Arc::new(MemoryResults::default()),
        KpiRules::default(),
    );
    let router = router_with_service(service, AppEnvironment::Production);

    let response = router
        .oneshot(post_simulation(json!({
            "numberOfDrivers": 1,
            "routeStartTime": "08:00",
            "maxHoursPerDay": 8
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Server error during simulation calculation")
    );
    assert!(payload.get("error").is_none());
}

#[tokio::test]
async fn history_route_returns_newest_first() {
    let (service, _) = build_service(mixed_orders());
    let service = Arc::new(service);
    service.run(RunRequest::new(1, "08:00", 8.0)).expect("first run");
    service.run(RunRequest::new(3, "07:30", 9.0)).expect("second run");
    let router = crate::simulation::simulation_router(service, AppEnvironment::Test);

    let response = router
        .oneshot(
            Request::get("/api/simulation/history")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], json!("sim-2"));
    assert_eq!(entries[0]["numberOfDrivers"], json!(3));
    assert_eq!(entries[0]["routeStartTime"], json!("07:30"));
    assert!(entries[0]["timestamp"].is_string());
    assert_eq!(entries[1]["id"], json!("sim-1"));
    assert_eq!(entries[1]["totalProfit"], json!(2535.0));
}

#[tokio::test]
async fn history_failure_is_a_server_error() {
    let service = SimulationService::new(
        Arc::new(MemoryOrders::default()),
        Arc::new(FailingResults),
        KpiRules::default(),
    );
    let router = router_with_service(service, AppEnvironment::Test);

    let response = router
        .oneshot(
            Request::get("/api/simulation/history")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["message"],
        json!("Server error fetching simulation history")
    );
}
