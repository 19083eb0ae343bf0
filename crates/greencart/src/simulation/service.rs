use std::sync::Arc;

use tracing::{error, info};

use super::engine::{EvaluationSummary, FleetKpis, SimulationEngine};
use super::params::{InputError, RunParameters, RunRequest};
use super::repository::{
    NewSimulationResult, OrderStore, RepositoryError, ResultStore, SimulationRecord,
};
use super::rules::KpiRules;

/// Service composing parameter validation, the order snapshot, the engine, and history.
pub struct SimulationService<O, S> {
    orders: Arc<O>,
    results: Arc<S>,
    engine: Arc<SimulationEngine>,
}

impl<O, S> SimulationService<O, S>
where
    O: OrderStore + 'static,
    S: ResultStore + 'static,
{
    pub fn new(orders: Arc<O>, results: Arc<S>, rules: KpiRules) -> Self {
        Self {
            orders,
            results,
            engine: Arc::new(SimulationEngine::new(rules)),
        }
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    /// Validate the request, evaluate the current orders, and persist the outcome.
    pub fn run(&self, request: RunRequest) -> Result<SimulationRecord, SimulationServiceError> {
        let parameters = RunParameters::try_from(request)?;
        let summary = self.evaluate()?;
        let kpis = summary.kpis;

        info!(
            drivers = parameters.number_of_drivers,
            start = %parameters.route_start_time,
            deliveries = kpis.total_deliveries,
            on_time = kpis.on_time_deliveries,
            skipped = summary.skipped.len(),
            profit = kpis.total_profit,
            "simulation evaluated"
        );

        self.results
            .save(NewSimulationResult { parameters, kpis })
            .map_err(|source| {
                error!(error = %source, profit = kpis.total_profit, "failed to persist simulation result");
                SimulationServiceError::Persistence { kpis, source }
            })
    }

    /// Evaluate the current order snapshot without recording anything.
    pub fn evaluate(&self) -> Result<EvaluationSummary, SimulationServiceError> {
        let orders = self
            .orders
            .find_all()
            .map_err(SimulationServiceError::OrderStore)?;
        Ok(self.engine.evaluate(&orders))
    }

    /// Stored runs, newest first.
    pub fn history(&self) -> Result<Vec<SimulationRecord>, SimulationServiceError> {
        self.results
            .list_all()
            .map_err(SimulationServiceError::History)
    }
}

/// Error raised by the simulation service.
#[derive(Debug, thiserror::Error)]
pub enum SimulationServiceError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to load orders: {0}")]
    OrderStore(#[source] RepositoryError),
    #[error("simulation computed but not saved: {source}")]
    Persistence {
        kpis: FleetKpis,
        #[source]
        source: RepositoryError,
    },
    #[error("failed to load simulation history: {0}")]
    History(#[source] RepositoryError),
}

impl SimulationServiceError {
    /// KPIs that were computed before the failure, if any.
    pub fn computed_kpis(&self) -> Option<&FleetKpis> {
        match self {
            SimulationServiceError::Persistence { kpis, .. } => Some(kpis),
            _ => None,
        }
    }
}
