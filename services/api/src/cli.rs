use crate::report::{run_simulation_report, SimulateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use greencart::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "GreenCart Logistics",
    about = "Serve the GreenCart fleet API or run delivery KPI simulations from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run a one-off KPI simulation over CSV exports and print the results
    Simulate(SimulateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding routes.csv, drivers.csv, and orders.csv to load at startup
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Simulate(args) => run_simulation_report(args),
    }
}
