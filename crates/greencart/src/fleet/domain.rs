use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier wrapper for delivery routes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(pub String);

/// Identifier wrapper for customer orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub String);

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Congestion class recorded for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    pub const fn label(self) -> &'static str {
        match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Medium => "Medium",
            TrafficLevel::High => "High",
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown traffic level '{0}' (expected Low, Medium, or High)")]
pub struct UnknownTrafficLevel(pub String);

impl FromStr for TrafficLevel {
    type Err = UnknownTrafficLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(TrafficLevel::Low),
            "medium" => Ok(TrafficLevel::Medium),
            "high" => Ok(TrafficLevel::High),
            _ => Err(UnknownTrafficLevel(value.to_string())),
        }
    }
}

/// Route reference data. Distances are kilometres, base time is minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub route_id: RouteId,
    pub distance_in_km: f64,
    #[serde(default)]
    pub traffic_level: TrafficLevel,
    pub base_time: f64,
}

/// Stored order; the route is held by reference and may not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    pub value_rs: f64,
    pub assigned_route: Option<RouteId>,
    pub actual_delivery_duration_minutes: f64,
}

impl Order {
    pub fn resolve(&self, routes: &HashMap<RouteId, Route>) -> OrderSnapshot {
        let route = self
            .assigned_route
            .as_ref()
            .and_then(|route_id| routes.get(route_id))
            .cloned();

        OrderSnapshot {
            order_id: self.order_id.clone(),
            value_rs: self.value_rs,
            assigned_route: route,
            actual_delivery_duration_minutes: self.actual_delivery_duration_minutes,
        }
    }
}

/// Order with its route resolved inline, as consumed by the simulation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub order_id: OrderId,
    pub value_rs: f64,
    pub assigned_route: Option<Route>,
    pub actual_delivery_duration_minutes: f64,
}

/// Driver roster entry. Hours are informational and do not feed the KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub name: String,
    pub current_shift_hours: f64,
    #[serde(rename = "past7DayWorkHours")]
    pub past_7_day_work_hours: f64,
}

/// Resolve every order against the route table, preserving order sequence.
pub fn resolve_orders(orders: &[Order], routes: &[Route]) -> Vec<OrderSnapshot> {
    let table: HashMap<RouteId, Route> = routes
        .iter()
        .map(|route| (route.route_id.clone(), route.clone()))
        .collect();

    orders.iter().map(|order| order.resolve(&table)).collect()
}
