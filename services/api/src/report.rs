use crate::infra::{InMemoryFleetStore, InMemorySimulationHistory};
use clap::Args;
use greencart::error::AppError;
use greencart::ingest::FleetDataset;
use greencart::simulation::{
    EvaluationSummary, KpiRules, RunRequest, SimulationRecord, SimulationService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Directory holding routes.csv, drivers.csv, and orders.csv
    #[arg(long)]
    pub(crate) data_dir: PathBuf,
    /// Number of drivers available for the run
    #[arg(long)]
    pub(crate) drivers: u32,
    /// Route start time (HH:MM)
    #[arg(long, default_value = "09:00")]
    pub(crate) start: String,
    /// Maximum working hours per driver per day
    #[arg(long, default_value_t = 8.0)]
    pub(crate) max_hours: f64,
    /// Print the economics of every evaluated order
    #[arg(long)]
    pub(crate) list_orders: bool,
}

pub(crate) fn run_simulation_report(args: SimulateArgs) -> Result<(), AppError> {
    let SimulateArgs {
        data_dir,
        drivers,
        start,
        max_hours,
        list_orders,
    } = args;

    let dataset = FleetDataset::from_dir(&data_dir)?;
    println!(
        "Fleet data: {} routes, {} drivers, {} orders ({})",
        dataset.routes.len(),
        dataset.drivers.len(),
        dataset.orders.len(),
        data_dir.display()
    );

    let service = SimulationService::new(
        Arc::new(InMemoryFleetStore::from_dataset(dataset)),
        Arc::new(InMemorySimulationHistory::default()),
        KpiRules::default(),
    );

    let record = match service.run(RunRequest::new(drivers, &start, max_hours)) {
        Ok(record) => record,
        Err(err) => {
            println!("Simulation rejected: {}", err);
            return Ok(());
        }
    };
    let summary = match service.evaluate() {
        Ok(summary) => summary,
        Err(err) => {
            println!("Order breakdown unavailable: {}", err);
            return Ok(());
        }
    };

    render_simulation_report(&record, &summary, list_orders);
    Ok(())
}

pub(crate) fn render_simulation_report(
    record: &SimulationRecord,
    summary: &EvaluationSummary,
    list_orders: bool,
) {
    let params = &record.parameters;
    let kpis = &record.kpis;

    println!("\nSimulation {} at {}", record.id.0, record.timestamp.to_rfc3339());
    println!(
        "Parameters: {} drivers | start {} | max {:.1} h/day",
        params.number_of_drivers, params.route_start_time, params.max_hours_per_day
    );

    println!("\nKey performance indicators");
    println!("- Total profit: {:.2}", kpis.total_profit);
    println!(
        "- Efficiency: {:.2}% ({}/{} on time)",
        kpis.efficiency_score, kpis.on_time_deliveries, kpis.total_deliveries
    );
    println!("- Fuel cost: {:.2}", kpis.total_fuel_cost);

    let breakdown = &summary.breakdown;
    println!("\nBreakdown");
    println!("- Late deliveries: {}", breakdown.late_deliveries);
    println!("- Bonuses earned: {:.2}", breakdown.total_bonus);
    println!("- Penalties applied: {:.2}", breakdown.total_penalty);

    if summary.skipped.is_empty() {
        println!("\nSkipped orders: none");
    } else {
        println!("\nSkipped orders (no resolvable route)");
        for order_id in &summary.skipped {
            println!("- {}", order_id);
        }
    }

    if list_orders {
        println!("\nPer-order economics");
        for order in &summary.orders {
            let status = if order.is_late { "late" } else { "on time" };
            println!(
                "- {} | route {} | {} | fuel {:.2} | bonus {:.2} | penalty {:.2} | profit {:.2}",
                order.order_id,
                order.route_id,
                status,
                order.fuel_cost,
                order.bonus,
                order.penalty,
                order.profit
            );
        }
    }
}
