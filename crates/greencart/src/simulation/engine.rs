use serde::{Deserialize, Serialize};
use tracing::warn;

use super::rules::{evaluate_order, KpiRules, OrderEvaluation};
use crate::fleet::{OrderId, OrderSnapshot};

/// Fleet-level KPIs for one simulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetKpis {
    pub total_profit: f64,
    /// Share of evaluated orders delivered on time, in percent and unrounded.
    pub efficiency_score: f64,
    pub on_time_deliveries: u32,
    pub total_deliveries: u32,
    pub total_fuel_cost: f64,
}

/// Secondary totals that explain how the profit figure was reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiBreakdown {
    pub late_deliveries: u32,
    pub total_bonus: f64,
    pub total_penalty: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct KpiTally {
    deliveries: u32,
    on_time: u32,
    profit: f64,
    fuel_cost: f64,
    bonus: f64,
    penalty: f64,
}

impl KpiTally {
    fn absorb(self, evaluation: &OrderEvaluation) -> Self {
        Self {
            deliveries: self.deliveries + 1,
            on_time: self.on_time + u32::from(!evaluation.is_late),
            profit: self.profit + evaluation.profit,
            fuel_cost: self.fuel_cost + evaluation.fuel_cost,
            bonus: self.bonus + evaluation.bonus,
            penalty: self.penalty + evaluation.penalty,
        }
    }

    fn finish(self) -> (FleetKpis, KpiBreakdown) {
        let efficiency_score = if self.deliveries > 0 {
            (f64::from(self.on_time) / f64::from(self.deliveries)) * 100.0
        } else {
            0.0
        };

        let kpis = FleetKpis {
            total_profit: self.profit,
            efficiency_score,
            on_time_deliveries: self.on_time,
            total_deliveries: self.deliveries,
            total_fuel_cost: self.fuel_cost,
        };
        let breakdown = KpiBreakdown {
            late_deliveries: self.deliveries - self.on_time,
            total_bonus: self.bonus,
            total_penalty: self.penalty,
        };
        (kpis, breakdown)
    }
}

/// Everything the engine learned from one pass over an order snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationSummary {
    pub kpis: FleetKpis,
    pub breakdown: KpiBreakdown,
    pub orders: Vec<OrderEvaluation>,
    /// Orders left out of every total because their route did not resolve.
    pub skipped: Vec<OrderId>,
}

/// Stateless evaluator applying the rate table to an order snapshot.
#[derive(Debug, Clone, Default)]
pub struct SimulationEngine {
    rules: KpiRules,
}

impl SimulationEngine {
    pub fn new(rules: KpiRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &KpiRules {
        &self.rules
    }

    pub fn evaluate(&self, orders: &[OrderSnapshot]) -> EvaluationSummary {
        let mut skipped = Vec::new();
        let evaluations: Vec<OrderEvaluation> = orders
            .iter()
            .filter_map(|order| match &order.assigned_route {
                Some(route) => Some(evaluate_order(order, route, &self.rules)),
                None => {
                    warn!(order_id = %order.order_id, "order has no resolvable route, skipping");
                    skipped.push(order.order_id.clone());
                    None
                }
            })
            .collect();

        let (kpis, breakdown) = evaluations
            .iter()
            .fold(KpiTally::default(), KpiTally::absorb)
            .finish();

        EvaluationSummary {
            kpis,
            breakdown,
            orders: evaluations,
            skipped,
        }
    }
}
