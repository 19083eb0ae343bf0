use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;

use super::engine::FleetKpis;
use super::params::RunRequest;
use super::repository::{OrderStore, ResultStore, SimulationId};
use super::service::{SimulationService, SimulationServiceError};
use crate::config::AppEnvironment;

pub const RUN_COMPLETED_MESSAGE: &str = "Simulation completed and KPIs calculated successfully.";
const RUN_FAILED_MESSAGE: &str = "Server error during simulation calculation";
const RUN_NOT_SAVED_MESSAGE: &str = "Simulation completed but results could not be saved.";
const HISTORY_FAILED_MESSAGE: &str = "Server error fetching simulation history";

/// Shared handler state: the service plus whether failures may expose their cause.
pub struct SimulationState<O, S> {
    pub(crate) service: Arc<SimulationService<O, S>>,
    pub(crate) expose_error_detail: bool,
}

impl<O, S> Clone for SimulationState<O, S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            expose_error_detail: self.expose_error_detail,
        }
    }
}

/// Body returned after a successful run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    #[serde(flatten)]
    pub kpis: FleetKpis,
    pub simulation_id: SimulationId,
    pub message: &'static str,
}

/// Router builder exposing the simulation run and history endpoints.
pub fn simulation_router<O, S>(
    service: Arc<SimulationService<O, S>>,
    environment: AppEnvironment,
) -> Router
where
    O: OrderStore + 'static,
    S: ResultStore + 'static,
{
    let state = SimulationState {
        service,
        expose_error_detail: environment.exposes_error_detail(),
    };

    Router::new()
        .route("/api/simulation", post(run_handler::<O, S>))
        .route("/api/simulation/history", get(history_handler::<O, S>))
        .with_state(state)
}

pub(crate) async fn run_handler<O, S>(
    State(state): State<SimulationState<O, S>>,
    payload: Result<Json<RunRequest>, JsonRejection>,
) -> Response
where
    O: OrderStore + 'static,
    S: ResultStore + 'static,
{
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let payload = json!({ "message": rejection.body_text() });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match state.service.run(request) {
        Ok(record) => {
            let body = RunResponse {
                kpis: record.kpis,
                simulation_id: record.id,
                message: RUN_COMPLETED_MESSAGE,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(SimulationServiceError::Input(error)) => {
            let payload = json!({
                "message": error.to_string(),
                "fields": error.fields(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(error @ SimulationServiceError::Persistence { .. }) => {
            server_error(RUN_NOT_SAVED_MESSAGE, &error, state.expose_error_detail)
        }
        Err(other) => server_error(RUN_FAILED_MESSAGE, &other, state.expose_error_detail),
    }
}

pub(crate) async fn history_handler<O, S>(State(state): State<SimulationState<O, S>>) -> Response
where
    O: OrderStore + 'static,
    S: ResultStore + 'static,
{
    match state.service.history() {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(error) => server_error(HISTORY_FAILED_MESSAGE, &error, state.expose_error_detail),
    }
}

fn server_error(message: &str, error: &SimulationServiceError, expose_detail: bool) -> Response {
    let payload = if expose_detail {
        json!({ "message": message, "error": error.to_string() })
    } else {
        json!({ "message": message })
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}
