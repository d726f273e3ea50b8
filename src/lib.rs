use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::domain::solution::solution::Solution;
use crate::domain::strategy::strategy_trait::StrategyDependencies;
use crate::domain::strategy::strategy_type::StrategyType;
use crate::error::Result;
use crate::loader::parser::{load_cluster_model, load_telemetry};

pub mod api;
pub mod domain;
pub mod error;
pub mod loader;
pub mod logger;

/// Loads a cluster and its telemetry from JSON files and runs one strategy over them.
pub fn decide(cluster_file: impl AsRef<Path>, telemetry_file: impl AsRef<Path>, strategy_name: &str, parameters: &Map<String, Value>) -> Result<Solution> {
    let cluster_model = load_cluster_model(cluster_file)?;
    log::info!("Cluster model loaded: {} hosts, {} workloads.", cluster_model.host_count(), cluster_model.workload_count());

    let datasource = load_telemetry(telemetry_file)?;
    let dependencies = StrategyDependencies::new(Arc::new(datasource));

    let mut strategy = StrategyType::from_str(strategy_name)?.get_instance(parameters, dependencies)?;
    Ok(strategy.execute(Some(cluster_model))?)
}
