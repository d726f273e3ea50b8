use std::str::FromStr;
use std::sync::Arc;

use chrono::Duration;
use serde_json::{Map, Value};

use crate::domain::action::migrate::{MIGRATE, MigrationPlan, MigrationType};
use crate::domain::clock::clock::Clock;
use crate::domain::cluster::host::Host;
use crate::domain::cluster::workload::Workload;
use crate::domain::datasource::datasource_trait::Datasource;
use crate::domain::datasource::datasource_type::DatasourceType;
use crate::domain::strategy::config::{ConfigSchema, OptionSpec, OptionType, StrategyInput};
use crate::domain::strategy::strategy_trait::{Strategy, StrategyBase, StrategyDependencies, attach_final_model, check_cluster_model};
use crate::domain::strategy::workload_selection::WorkloadSelection;
use crate::domain::utils::id::ResourceId;
use crate::domain::utils::statistics::RunStatistics;
use crate::error::{ClusterError, ConfigError, StrategyError};

pub const OUTLET_TEMPERATURE: &str = "outlet_temperature";

const THRESHOLD: &str = "threshold";
const PERIOD: &str = "period";
const GRANULARITY: &str = "granularity";
const DATASOURCE: &str = "datasource";
const WORKLOAD_SELECTION: &str = "workload_selection";

#[derive(Debug, Clone, PartialEq)]
pub struct OutletTempConfig {
    /// Outlet temperature in degrees Celsius at or above which a host counts as overloaded.
    pub threshold: f64,
    pub period: Duration,
    pub granularity: Duration,
    pub datasource: DatasourceType,
    pub workload_selection: WorkloadSelection,
}

impl OutletTempConfig {
    pub fn schema() -> ConfigSchema {
        ConfigSchema::new(vec![
            OptionSpec::new(THRESHOLD, OptionType::Number, "temperature threshold for migration").with_default(35.0),
            OptionSpec::new(PERIOD, OptionType::Number, "The time interval in seconds for getting statistic aggregation").with_default(30),
            OptionSpec::new(GRANULARITY, OptionType::Number, "The time between two measures in an aggregated timeseries of a metric.").with_default(300),
            OptionSpec::new(DATASOURCE, OptionType::String, "Telemetry backend the samples come from").with_default("ceilometer").with_choices(&DatasourceType::CHOICES),
            OptionSpec::new(WORKLOAD_SELECTION, OptionType::String, "How to pick the workload to move off an overloaded host")
                .with_default("first_active")
                .with_choices(&WorkloadSelection::CHOICES),
        ])
    }
}

fn positive_seconds(input: &StrategyInput, name: &str) -> Result<Duration, ConfigError> {
    let seconds = input.get_f64(name)?;
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(ConfigError::InvalidValue { name: name.to_string(), reason: format!("expected a positive number of seconds, got {}", seconds) });
    }
    let millis = (seconds * 1000.0).round();
    if millis >= i64::MAX as f64 {
        return Err(ConfigError::InvalidValue { name: name.to_string(), reason: format!("{} seconds is too large", seconds) });
    }
    Duration::try_milliseconds(millis as i64).ok_or_else(|| ConfigError::InvalidValue { name: name.to_string(), reason: format!("{} seconds is too large", seconds) })
}

impl TryFrom<&StrategyInput> for OutletTempConfig {
    type Error = ConfigError;

    fn try_from(input: &StrategyInput) -> Result<Self, Self::Error> {
        let threshold = input.get_f64(THRESHOLD)?;
        if !threshold.is_finite() {
            return Err(ConfigError::InvalidValue { name: THRESHOLD.to_string(), reason: "threshold must be finite".to_string() });
        }
        Ok(Self {
            threshold,
            period: positive_seconds(input, PERIOD)?,
            granularity: positive_seconds(input, GRANULARITY)?,
            datasource: DatasourceType::from_str(input.get_str(DATASOURCE)?)?,
            workload_selection: WorkloadSelection::from_str(input.get_str(WORKLOAD_SELECTION)?)?,
        })
    }
}

impl Default for OutletTempConfig {
    fn default() -> Self {
        Self {
            threshold: 35.0,
            period: Duration::seconds(30),
            granularity: Duration::seconds(300),
            datasource: DatasourceType::default(),
            workload_selection: WorkloadSelection::default(),
        }
    }
}

/// A host together with its aggregated outlet temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct HostMetric {
    pub host: Host,
    pub value: f64,
}

/// Migrates one workload off the hottest host whose outlet temperature reached the threshold,
/// onto the coolest host under the threshold that can still fit it.
#[derive(Debug)]
pub struct OutletTempControl {
    base: StrategyBase,
    config: OutletTempConfig,
    datasource: Arc<dyn Datasource>,
    clock: Arc<dyn Clock>,
    statistics: RunStatistics,
}

impl OutletTempControl {
    pub fn new(config: OutletTempConfig, dependencies: StrategyDependencies) -> Self {
        Self {
            base: StrategyBase::new(OUTLET_TEMPERATURE, &dependencies.span),
            config,
            datasource: dependencies.datasource,
            clock: dependencies.clock,
            statistics: RunStatistics::default(),
        }
    }

    pub fn from_parameters(parameters: &Map<String, Value>, dependencies: StrategyDependencies) -> Result<Self, StrategyError> {
        let input = OutletTempConfig::schema().validate(parameters)?;
        let config = OutletTempConfig::try_from(&input)?;
        Ok(Self::new(config, dependencies))
    }

    pub fn config(&self) -> &OutletTempConfig {
        &self.config
    }

    /// Counters of the last run.
    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Splits eligible hosts into (overloaded, target) by their aggregated outlet temperature.
    /// Hosts without a usable sample end up in neither set.
    pub fn group_hosts_by_outlet_temp(&mut self) -> Result<(Vec<HostMetric>, Vec<HostMetric>), StrategyError> {
        let hosts = self.base.cluster_model()?.eligible_hosts();
        self.statistics.eligible_hosts = hosts.len();
        if hosts.is_empty() {
            tracing::warn!("No eligible hosts in the cluster");
        }

        let metric_name = self.config.datasource.host_outlet_temp_metric();
        let aggregation = self.config.datasource.aggregation();
        let window = self.config.datasource.build_window(self.config.period, self.config.granularity, self.clock.as_ref())?;

        let mut overloaded = Vec::new();
        let mut targets = Vec::new();
        for host in hosts {
            let value = match self.datasource.statistic_aggregation(host.id.as_str(), metric_name, &window, aggregation) {
                Some(value) if !value.is_nan() => value,
                _ => {
                    tracing::warn!("{}: no outlet temp data", host.id);
                    self.statistics.hosts_without_data += 1;
                    continue;
                }
            };
            tracing::debug!("{}: outlet temperature {}", host.id, value);

            if value >= self.config.threshold {
                overloaded.push(HostMetric { host, value });
            } else {
                targets.push(HostMetric { host, value });
            }
        }

        self.statistics.overloaded_hosts = overloaded.len();
        self.statistics.target_hosts = targets.len();
        Ok((overloaded, targets))
    }

    /// Walks the overloaded hosts in the given order and returns the first host that has a
    /// workload the selection policy accepts, along with that workload.
    pub fn choose_workload_to_migrate(&self, overloaded: &[HostMetric]) -> Result<Option<(HostMetric, Workload)>, StrategyError> {
        let model = self.base.cluster_model()?;
        for source in overloaded {
            let hosted = model.hosted_workload_ids(&source.host.id)?;
            let candidates = hosted.into_iter().filter_map(|workload_id| match model.get_workload(&workload_id) {
                None => {
                    tracing::info!("Workload {} vanished from {}, skipped", workload_id, source.host.id);
                    None
                }
                Some(workload) if !workload.is_migration_candidate() => {
                    tracing::info!("Workload {} is {}, skipped", workload.id, workload.state);
                    None
                }
                Some(workload) => Some(workload),
            });

            if let Some(workload) = self.config.workload_selection.select(candidates) {
                return Ok(Some((source.clone(), workload)));
            }
        }
        Ok(None)
    }

    /// Targets with enough spare capacity left for the workload.
    pub fn filter_destination_hosts(&self, targets: &[HostMetric], workload: &Workload) -> Result<Vec<HostMetric>, StrategyError> {
        let model = self.base.cluster_model()?;
        let mut destinations = Vec::new();
        for target in targets {
            if model.spare_capacity(&target.host.id)?.can_accommodate(&workload.demand) {
                destinations.push(target.clone());
            }
        }
        Ok(destinations)
    }
}

impl Strategy for OutletTempControl {
    fn get_base(&self) -> &StrategyBase {
        &self.base
    }

    fn get_base_mut(&mut self) -> &mut StrategyBase {
        &mut self.base
    }

    fn get_display_name(&self) -> &'static str {
        "Outlet temperature based strategy"
    }

    fn get_schema(&self) -> ConfigSchema {
        OutletTempConfig::schema()
    }

    fn pre_execute(&mut self) -> Result<(), StrategyError> {
        self.statistics = RunStatistics::default();
        check_cluster_model(&mut self.base)?;
        tracing::debug!("Initializing outlet temperature strategy (threshold {})", self.config.threshold);
        Ok(())
    }

    fn do_execute(&mut self) -> Result<(), StrategyError> {
        let (mut overloaded, targets) = self.group_hosts_by_outlet_temp()?;

        if overloaded.is_empty() {
            tracing::debug!("No hosts require optimization");
            return Ok(());
        }
        if targets.is_empty() {
            tracing::warn!("No hosts under outlet temp threshold found");
            return Ok(());
        }

        overloaded.sort_by(|a, b| b.value.total_cmp(&a.value));

        let Some((source, workload)) = self.choose_workload_to_migrate(&overloaded)? else {
            tracing::info!("No workload to migrate on overloaded hosts");
            return Ok(());
        };

        let destinations = self.filter_destination_hosts(&targets, &workload)?;
        let Some(destination) = destinations.iter().min_by(|a, b| a.value.total_cmp(&b.value)) else {
            tracing::info!("No proper target host could be found for {}", workload.id);
            return Ok(());
        };

        let model = self.base.cluster_model_mut()?;
        match model.plan_move(&workload.id, &source.host.id, &destination.host.id) {
            Ok(()) => {}
            Err(ClusterError::WorkloadNotFound(id)) => {
                tracing::warn!("Workload {} vanished before the move could be planned", id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }

        let plan = MigrationPlan { migration_type: MigrationType::Live, source: source.host.id.clone(), destination: destination.host.id.clone() };
        self.base.solution.add_action(MIGRATE, ResourceId::from(&workload.id), plan.to_parameters())?;
        tracing::info!("Planned live migration of {} from {} ({}) to {} ({})", workload.id, source.host.id, source.value, destination.host.id, destination.value);
        Ok(())
    }

    fn post_execute(&mut self) -> Result<(), StrategyError> {
        attach_final_model(&mut self.base)?;
        self.statistics.log(OUTLET_TEMPERATURE, self.base.solution.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cluster::cluster_model::ClusterModel;
    use crate::domain::cluster::resources::ResourceVector;
    use crate::domain::cluster::workload::WorkloadState;
    use crate::domain::datasource::datasource_mock::StaticDatasource;
    use crate::domain::utils::id::{HostId, WorkloadId};
    use serde_json::json;
    use tracing_test::traced_test;

    const METRIC: &str = "hardware.ipmi.node.outlet_temperature";

    fn model() -> ClusterModel {
        let model = ClusterModel::new();
        for id in ["h1", "h2", "h3"] {
            model.add_host(Host::new(HostId::new(id), ResourceVector::new(8, 16384, 200))).unwrap();
        }
        model.add_workload(Workload::new(WorkloadId::new("w1"), ResourceVector::new(2, 2048, 20), WorkloadState::Active), &HostId::new("h1")).unwrap();
        model
    }

    fn strategy(datasource: StaticDatasource) -> OutletTempControl {
        OutletTempControl::new(OutletTempConfig::default(), StrategyDependencies::new(Arc::new(datasource)))
    }

    #[test]
    fn defaults_match_the_schema() {
        let input = OutletTempConfig::schema().defaults().unwrap();
        assert_eq!(OutletTempConfig::try_from(&input).unwrap(), OutletTempConfig::default());
    }

    #[test]
    fn non_positive_period_is_rejected() {
        let parameters = json!({"period": 0}).as_object().cloned().unwrap();
        let result = OutletTempControl::from_parameters(&parameters, StrategyDependencies::new(Arc::new(StaticDatasource::new())));
        assert!(matches!(result, Err(StrategyError::Config(ConfigError::InvalidValue { .. }))));
    }

    #[traced_test]
    #[test]
    fn hosts_without_data_are_warned_about_and_excluded() {
        let datasource = StaticDatasource::new().with_sample("h1", METRIC, 40.0).with_sample("h3", METRIC, f64::NAN);
        let mut strategy = strategy(datasource);
        strategy.base.cluster_model = Some(model());

        let (overloaded, targets) = strategy.group_hosts_by_outlet_temp().unwrap();

        assert_eq!(overloaded.len(), 1);
        assert!(targets.is_empty());
        assert_eq!(strategy.statistics().hosts_without_data, 2);
        assert!(logs_contain("h2: no outlet temp data"));
        assert!(logs_contain("h3: no outlet temp data"));
    }

    #[traced_test]
    #[test]
    fn inactive_workloads_are_skipped() {
        let cluster = model();
        cluster.add_workload(Workload::new(WorkloadId::new("w0"), ResourceVector::new(1, 512, 5), WorkloadState::Paused), &HostId::new("h2")).unwrap();
        let datasource = StaticDatasource::new().with_sample("h1", METRIC, 30.0).with_sample("h2", METRIC, 50.0).with_sample("h3", METRIC, 20.0);

        let solution = strategy(datasource).execute(Some(cluster)).unwrap();

        assert!(solution.is_empty());
        assert!(logs_contain("Workload w0 is paused, skipped"));
    }

    #[test]
    fn statistics_describe_the_last_run() {
        let datasource = StaticDatasource::new().with_sample("h1", METRIC, 40.0).with_sample("h2", METRIC, 20.0);
        let mut strategy = strategy(datasource);

        let solution = strategy.execute(Some(model())).unwrap();

        assert_eq!(solution.len(), 1);
        let statistics = strategy.statistics();
        assert_eq!((statistics.eligible_hosts, statistics.hosts_without_data), (3, 1));
        assert_eq!((statistics.overloaded_hosts, statistics.target_hosts), (1, 1));
    }

    #[traced_test]
    #[test]
    fn model_is_logged_before_and_after_the_run() {
        let datasource = StaticDatasource::new().with_sample("h1", METRIC, 40.0).with_sample("h2", METRIC, 20.0);

        strategy(datasource).execute(Some(model())).unwrap();

        assert!(logs_contain("Cluster (3 hosts, 1 workloads, 0 pending moves)"));
        assert!(logs_contain("Cluster (3 hosts, 1 workloads, 1 pending moves)"));
    }
}
