//! Bulk loading of fleet reference data from CSV exports.

mod parser;

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::fleet::{resolve_orders, Driver, Order, OrderSnapshot, Route};

pub const ROUTES_FILE: &str = "routes.csv";
pub const DRIVERS_FILE: &str = "drivers.csv";
pub const ORDERS_FILE: &str = "orders.csv";

#[derive(Debug)]
pub enum IngestError {
    Io { path: PathBuf, source: std::io::Error },
    Csv { file: &'static str, source: csv::Error },
    InvalidField {
        file: &'static str,
        line: u64,
        field: &'static str,
        reason: String,
    },
    Duplicate { file: &'static str, id: String },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            IngestError::Csv { file, source } => write!(f, "invalid CSV in {}: {}", file, source),
            IngestError::InvalidField {
                file,
                line,
                field,
                reason,
            } => write!(f, "{}:{} field '{}' {}", file, line, field, reason),
            IngestError::Duplicate { file, id } => {
                write!(f, "{} lists '{}' more than once", file, id)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io { source, .. } => Some(source),
            IngestError::Csv { source, .. } => Some(source),
            IngestError::InvalidField { .. } | IngestError::Duplicate { .. } => None,
        }
    }
}

/// Routes, drivers, and orders loaded from one export directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FleetDataset {
    pub routes: Vec<Route>,
    pub drivers: Vec<Driver>,
    pub orders: Vec<Order>,
}

impl FleetDataset {
    /// Load `routes.csv`, `drivers.csv`, and `orders.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, IngestError> {
        let dir = dir.as_ref();
        let dataset = Self::from_readers(
            open(&dir.join(ROUTES_FILE))?,
            open(&dir.join(DRIVERS_FILE))?,
            open(&dir.join(ORDERS_FILE))?,
        )?;

        info!(
            dir = %dir.display(),
            routes = dataset.routes.len(),
            drivers = dataset.drivers.len(),
            orders = dataset.orders.len(),
            "fleet data ingested"
        );
        Ok(dataset)
    }

    pub fn from_readers<R, D, O>(routes: R, drivers: D, orders: O) -> Result<Self, IngestError>
    where
        R: Read,
        D: Read,
        O: Read,
    {
        let routes = parser::parse_routes(routes)?;
        ensure_unique(ROUTES_FILE, routes.iter().map(|route| route.route_id.0.as_str()))?;

        let drivers = parser::parse_drivers(drivers)?;

        let orders = parser::parse_orders(orders)?;
        ensure_unique(ORDERS_FILE, orders.iter().map(|order| order.order_id.0.as_str()))?;

        Ok(Self {
            routes,
            drivers,
            orders,
        })
    }

    /// Orders with their routes resolved; unknown route ids resolve to nothing.
    pub fn order_snapshots(&self) -> Vec<OrderSnapshot> {
        resolve_orders(&self.orders, &self.routes)
    }
}

fn open(path: &Path) -> Result<File, IngestError> {
    File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_unique<'a>(
    file: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), IngestError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(IngestError::Duplicate {
                file,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
