use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use serde_json::Map;

use decision_engine::domain::action::action_registry::ActionRegistry;
use decision_engine::loader::parser::load_parameters;
use decision_engine::logger::{self, LoggerConfig};

#[derive(Parser)]
#[command(name = "decision-engine", about = "Runs one rebalancing strategy over a cluster snapshot")]
struct Cli {
    /// Cluster state as JSON (hosts with their workloads).
    #[arg(long)]
    cluster: PathBuf,

    /// Aggregated telemetry samples as JSON.
    #[arg(long)]
    telemetry: PathBuf,

    #[arg(long, default_value = "outlet_temperature")]
    strategy: String,

    /// Strategy options as a JSON object. Unset options take their defaults.
    #[arg(long)]
    parameters: Option<PathBuf>,

    /// Overrides RUST_LOG.
    #[arg(long)]
    log_level: Option<LevelFilter>,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(LoggerConfig { level: cli.log_level, log_dir: cli.log_dir.clone(), to_console: true }).context("failed to initialize logging")?;

    let parameters = match &cli.parameters {
        Some(path) => load_parameters(path).with_context(|| format!("failed to read parameters from {}", path.display()))?,
        None => Map::new(),
    };

    let solution = decision_engine::decide(&cli.cluster, &cli.telemetry, &cli.strategy, &parameters).with_context(|| format!("strategy '{}' failed", cli.strategy))?;

    let registry = ActionRegistry::with_default_actions();
    for descriptor in solution.actions() {
        let action = registry.materialize(descriptor).with_context(|| format!("action {} is not executable", descriptor.id()))?;
        log::info!("Action {} ({}) on {} validated", descriptor.id(), action.action_type(), descriptor.applies_to());
    }

    println!("{}", serde_json::to_string_pretty(&solution)?);
    Ok(())
}
