use chrono::Utc;
use greencart::fleet::{Driver, OrderSnapshot, Route};
use greencart::ingest::FleetDataset;
use greencart::simulation::{
    NewSimulationResult, OrderStore, RepositoryError, ResultStore, SimulationId,
    SimulationRecord,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Fleet reference data held in memory; orders resolve their routes on every read.
#[derive(Default, Clone)]
pub(crate) struct InMemoryFleetStore {
    dataset: Arc<Mutex<FleetDataset>>,
}

impl InMemoryFleetStore {
    pub(crate) fn from_dataset(dataset: FleetDataset) -> Self {
        Self {
            dataset: Arc::new(Mutex::new(dataset)),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, FleetDataset>, RepositoryError> {
        self.dataset
            .lock()
            .map_err(|_| RepositoryError::Unavailable("fleet store mutex poisoned".to_string()))
    }

    /// Swap in a freshly ingested dataset, dropping everything held before.
    pub(crate) fn replace(&self, dataset: FleetDataset) -> Result<(), RepositoryError> {
        *self.guard()? = dataset;
        Ok(())
    }

    pub(crate) fn routes(&self) -> Result<Vec<Route>, RepositoryError> {
        Ok(self.guard()?.routes.clone())
    }

    pub(crate) fn drivers(&self) -> Result<Vec<Driver>, RepositoryError> {
        Ok(self.guard()?.drivers.clone())
    }
}

impl OrderStore for InMemoryFleetStore {
    fn find_all(&self) -> Result<Vec<OrderSnapshot>, RepositoryError> {
        Ok(self.guard()?.order_snapshots())
    }
}

/// Append-only run history kept for the lifetime of the process.
#[derive(Default, Clone)]
pub(crate) struct InMemorySimulationHistory {
    records: Arc<Mutex<Vec<SimulationRecord>>>,
    sequence: Arc<AtomicU64>,
}

impl InMemorySimulationHistory {
    fn next_id(&self) -> SimulationId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        SimulationId(format!("sim-{id:06}"))
    }
}

impl ResultStore for InMemorySimulationHistory {
    fn save(&self, result: NewSimulationResult) -> Result<SimulationRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("history mutex poisoned".to_string()))?;
        let record = SimulationRecord::from_new(self.next_id(), Utc::now(), result);
        guard.push(record.clone());
        Ok(record)
    }

    fn list_all(&self) -> Result<Vec<SimulationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("history mutex poisoned".to_string()))?;
        let mut records: Vec<SimulationRecord> = guard.iter().rev().cloned().collect();
        records.sort_by(|left, right| right.timestamp.cmp(&left.timestamp));
        Ok(records)
    }
}
