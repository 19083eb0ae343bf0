use serde::{Deserialize, Serialize};

use crate::fleet::{OrderId, OrderSnapshot, Route, RouteId, TrafficLevel};

/// Rate table applied to every evaluated order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiRules {
    pub base_fuel_cost_per_km: f64,
    pub high_traffic_surcharge_per_km: f64,
    pub on_time_grace_minutes: f64,
    pub late_delivery_penalty: f64,
    pub high_value_threshold: f64,
    pub high_value_bonus_rate: f64,
}

impl Default for KpiRules {
    fn default() -> Self {
        Self {
            base_fuel_cost_per_km: 5.0,
            high_traffic_surcharge_per_km: 2.0,
            on_time_grace_minutes: 10.0,
            late_delivery_penalty: 50.0,
            high_value_threshold: 1000.0,
            high_value_bonus_rate: 0.10,
        }
    }
}

impl KpiRules {
    pub fn fuel_cost_per_km(&self, traffic: TrafficLevel) -> f64 {
        let surcharge = match traffic {
            TrafficLevel::High => self.high_traffic_surcharge_per_km,
            TrafficLevel::Medium | TrafficLevel::Low => 0.0,
        };
        self.base_fuel_cost_per_km + surcharge
    }

    /// Latest delivery duration, in minutes, that still counts as on time.
    pub fn on_time_threshold(&self, route: &Route) -> f64 {
        route.base_time + self.on_time_grace_minutes
    }
}

/// Economics of a single delivered order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvaluation {
    pub order_id: OrderId,
    pub route_id: RouteId,
    pub fuel_cost: f64,
    pub is_late: bool,
    pub penalty: f64,
    pub bonus: f64,
    pub profit: f64,
}

pub(crate) fn evaluate_order(
    order: &OrderSnapshot,
    route: &Route,
    rules: &KpiRules,
) -> OrderEvaluation {
    let fuel_cost = rules.fuel_cost_per_km(route.traffic_level) * route.distance_in_km;

    let is_late = order.actual_delivery_duration_minutes > rules.on_time_threshold(route);
    let penalty = if is_late {
        rules.late_delivery_penalty
    } else {
        0.0
    };

    let bonus = if !is_late && order.value_rs > rules.high_value_threshold {
        rules.high_value_bonus_rate * order.value_rs
    } else {
        0.0
    };

    let profit = order.value_rs + bonus - penalty - fuel_cost;

    OrderEvaluation {
        order_id: order.order_id.clone(),
        route_id: route.route_id.clone(),
        fuel_cost,
        is_late,
        penalty,
        bonus,
        profit,
    }
}
