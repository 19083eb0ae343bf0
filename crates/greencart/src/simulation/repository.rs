use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::engine::FleetKpis;
use super::params::RunParameters;
use crate::fleet::OrderSnapshot;

/// Identifier assigned by the result store when a run is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimulationId(pub String);

/// Outcome of a run that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSimulationResult {
    #[serde(flatten)]
    pub parameters: RunParameters,
    #[serde(flatten)]
    pub kpis: FleetKpis,
}

/// Immutable history entry as stored by a [`ResultStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRecord {
    pub id: SimulationId,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub parameters: RunParameters,
    #[serde(flatten)]
    pub kpis: FleetKpis,
}

impl SimulationRecord {
    pub fn from_new(id: SimulationId, timestamp: DateTime<Utc>, result: NewSimulationResult) -> Self {
        let NewSimulationResult { parameters, kpis } = result;
        Self {
            id,
            timestamp,
            parameters,
            kpis,
        }
    }
}

/// Read access to the current orders with their routes resolved.
pub trait OrderStore: Send + Sync {
    fn find_all(&self) -> Result<Vec<OrderSnapshot>, RepositoryError>;
}

/// Append-only history of simulation runs.
pub trait ResultStore: Send + Sync {
    /// Persist a run, assigning its identifier and timestamp.
    fn save(&self, result: NewSimulationResult) -> Result<SimulationRecord, RepositoryError>;
    /// Every stored run, newest first.
    fn list_all(&self) -> Result<Vec<SimulationRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
