//! Delivery KPI simulation for the GreenCart fleet.
//!
//! The crate holds the fleet data model, CSV ingestion, and the simulation engine together
//! with the service and router that expose it over HTTP.

pub mod config;
pub mod error;
pub mod fleet;
pub mod ingest;
pub mod simulation;
pub mod telemetry;
