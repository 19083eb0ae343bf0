//! What-if delivery simulation: per-order business rules folded into fleet KPIs.
//!
//! Each run validates its parameters, reads the current order snapshot from an
//! [`OrderStore`], evaluates every order with a resolvable route, and appends the
//! aggregate to the [`ResultStore`] history. The fleet parameters are echoed into the
//! stored record but do not limit which orders take part in the run.

pub mod engine;
pub mod params;
pub mod repository;
pub mod router;
pub(crate) mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use engine::{EvaluationSummary, FleetKpis, KpiBreakdown, SimulationEngine};
pub use params::{InputError, RunParameters, RunRequest};
pub use repository::{
    NewSimulationResult, OrderStore, RepositoryError, ResultStore, SimulationId,
    SimulationRecord,
};
pub use router::simulation_router;
pub use rules::{KpiRules, OrderEvaluation};
pub use service::{SimulationService, SimulationServiceError};
