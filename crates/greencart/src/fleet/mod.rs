//! Reference data for the delivery fleet: routes, orders, and drivers.

pub mod domain;

pub use domain::{
    resolve_orders, Driver, Order, OrderId, OrderSnapshot, Route, RouteId, TrafficLevel,
    UnknownTrafficLevel,
};
