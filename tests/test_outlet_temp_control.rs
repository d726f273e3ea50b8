use decision_engine::domain::action::migrate::{DESTINATION_NODE, MIGRATE, MIGRATION_TYPE, SOURCE_NODE};
use decision_engine::domain::clock::clock_mock::MockClock;
use decision_engine::domain::cluster::{
    cluster_model::ClusterModel,
    host::{Host, HostAvailability, HostStatus},
    resources::ResourceVector,
    workload::{Workload, WorkloadState},
};
use decision_engine::domain::datasource::{
    datasource_mock::StaticDatasource,
    datasource_trait::{Aggregation, AggregationWindow, Datasource},
    datasource_type::DatasourceType,
};
use decision_engine::domain::solution::solution::Solution;
use decision_engine::domain::strategy::{
    outlet_temp_control::{OutletTempConfig, OutletTempControl},
    strategy_trait::{Strategy, StrategyDependencies},
    workload_selection::WorkloadSelection,
};
use decision_engine::domain::utils::id::{HostId, ResourceId, WorkloadId};
use decision_engine::error::{ConfigError, StrategyError};

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;

const METRIC: &str = "hardware.ipmi.node.outlet_temperature";

fn host(model: &ClusterModel, id: &str, capacity: ResourceVector) {
    model.add_host(Host::new(HostId::new(id), capacity)).unwrap();
}

fn workload(model: &ClusterModel, id: &str, demand: ResourceVector, state: WorkloadState, on: &str) {
    model.add_workload(Workload::new(WorkloadId::new(id), demand, state), &HostId::new(on)).unwrap();
}

fn large() -> ResourceVector {
    ResourceVector::new(16, 32768, 500)
}

fn small() -> ResourceVector {
    ResourceVector::new(2, 4096, 40)
}

fn telemetry(samples: &[(&str, f64)]) -> StaticDatasource {
    samples.iter().fold(StaticDatasource::new(), |datasource, (id, value)| datasource.with_sample(*id, METRIC, *value))
}

fn run(model: ClusterModel, datasource: StaticDatasource) -> Result<Solution, StrategyError> {
    run_with(OutletTempConfig::default(), model, datasource)
}

fn run_with(config: OutletTempConfig, model: ClusterModel, datasource: StaticDatasource) -> Result<Solution, StrategyError> {
    let mut strategy = OutletTempControl::new(config, StrategyDependencies::new(Arc::new(datasource)));
    strategy.execute(Some(model))
}

fn assert_single_migration(solution: &Solution, workload: &str, source: &str, destination: &str) {
    assert_eq!(solution.len(), 1);
    let action = &solution.actions()[0];
    assert_eq!(action.action_type(), MIGRATE);
    assert_eq!(action.applies_to(), &ResourceId::new(workload));
    assert_eq!(action.input_parameters()[MIGRATION_TYPE], json!("live"));
    assert_eq!(action.input_parameters()[SOURCE_NODE], json!(source));
    assert_eq!(action.input_parameters()[DESTINATION_NODE], json!(destination));
}

/// Hot host A with one workload, cool host B with room for it.
fn two_host_model(b_capacity: ResourceVector) -> ClusterModel {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", b_capacity);
    workload(&model, "W", small(), WorkloadState::Active, "A");
    model
}

#[test]
fn test_hot_host_workload_moves_to_cool_host() {
    let solution = run(two_host_model(large()), telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();

    assert_single_migration(&solution, "W", "A", "B");
    let snapshot = solution.model().expect("solution carries the final model");
    assert_eq!(snapshot.host_of(&WorkloadId::new("W")), Some(&HostId::new("B")));
    assert_eq!(snapshot.pending_moves.len(), 1);
}

#[test]
fn test_insufficient_capacity_on_any_dimension_blocks_the_move() {
    for b_capacity in [ResourceVector::new(1, 32768, 500), ResourceVector::new(16, 2048, 500), ResourceVector::new(16, 32768, 10)] {
        let solution = run(two_host_model(b_capacity), telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();
        assert!(solution.is_empty(), "capacity {:?} should not fit", b_capacity);
    }
}

#[test]
fn test_exact_fit_is_accepted() {
    let solution = run(two_host_model(small()), telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();
    assert_single_migration(&solution, "W", "A", "B");
}

#[test]
fn test_single_host_without_telemetry() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    workload(&model, "W", small(), WorkloadState::Active, "A");

    let solution = run(model, StaticDatasource::new()).unwrap();
    assert!(solution.is_empty());
}

#[test]
fn test_hottest_overloaded_host_is_handled_first() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", large());
    host(&model, "C", large());
    workload(&model, "WA", small(), WorkloadState::Active, "A");
    workload(&model, "WC", small(), WorkloadState::Active, "C");

    let solution = run(model, telemetry(&[("A", 70.0), ("B", 20.0), ("C", 80.0)])).unwrap();
    assert_single_migration(&solution, "WC", "C", "B");
}

#[test]
fn test_next_overloaded_host_is_used_when_the_hottest_has_no_active_workload() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", large());
    host(&model, "C", large());
    workload(&model, "WA", small(), WorkloadState::Active, "A");
    workload(&model, "WC", small(), WorkloadState::Stopped, "C");

    let solution = run(model, telemetry(&[("A", 70.0), ("B", 20.0), ("C", 80.0)])).unwrap();
    assert_single_migration(&solution, "WA", "A", "B");
}

#[test]
fn test_overloaded_hosts_without_active_workload() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", large());
    workload(&model, "W1", small(), WorkloadState::Paused, "A");
    workload(&model, "W2", small(), WorkloadState::Error, "A");

    let solution = run(model, telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();
    assert!(solution.is_empty());
}

#[test]
fn test_coolest_feasible_destination_first_seen_on_ties() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", ResourceVector::new(1, 1024, 10));
    host(&model, "C", large());
    host(&model, "D", large());
    host(&model, "E", large());
    workload(&model, "W", small(), WorkloadState::Active, "A");

    let datasource = telemetry(&[("A", 70.0), ("B", 10.0), ("C", 25.0), ("D", 20.0), ("E", 20.0)]);
    let solution = run(model, datasource).unwrap();

    // B is coolest but too small; D and E tie and D was seen first.
    assert_single_migration(&solution, "W", "A", "D");
}

#[test]
fn test_overloaded_ties_keep_insertion_order() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", large());
    host(&model, "C", large());
    workload(&model, "WA", small(), WorkloadState::Active, "A");
    workload(&model, "WC", small(), WorkloadState::Active, "C");

    let solution = run(model, telemetry(&[("A", 70.0), ("B", 20.0), ("C", 70.0)])).unwrap();

    // A and C are equally hot; A was added first so it is drained first.
    assert_single_migration(&solution, "WA", "A", "B");
}

#[test]
fn test_threshold_is_inclusive_for_overloaded_hosts() {
    let solution = run(two_host_model(large()), telemetry(&[("A", 35.0), ("B", 34.9)])).unwrap();
    assert_single_migration(&solution, "W", "A", "B");
}

#[test]
fn test_everything_under_threshold_needs_no_action() {
    let solution = run(two_host_model(large()), telemetry(&[("A", 34.0), ("B", 20.0)])).unwrap();
    assert!(solution.is_empty());
    assert!(solution.is_frozen());
}

#[test]
fn test_no_target_hosts_means_no_action() {
    let solution = run(two_host_model(large()), telemetry(&[("A", 70.0), ("B", 60.0)])).unwrap();
    assert!(solution.is_empty());
}

#[test]
fn test_ineligible_hosts_are_never_queried_or_chosen() {
    let model = two_host_model(large());
    model.add_host(Host::new(HostId::new("D"), large()).with_status(HostStatus::Disabled)).unwrap();
    model.add_host(Host::new(HostId::new("O"), large()).with_availability(HostAvailability::Offline)).unwrap();
    let datasource = telemetry(&[("A", 70.0), ("B", 30.0), ("D", 5.0), ("O", 5.0)]);
    let recorder = datasource.clone();

    let solution = run(model, datasource).unwrap();

    assert_single_migration(&solution, "W", "A", "B");
    let queried: Vec<String> = recorder.queries().into_iter().map(|q| q.resource_id).collect();
    assert_eq!(queried, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_missing_model_is_fatal() {
    let mut strategy = OutletTempControl::new(OutletTempConfig::default(), StrategyDependencies::new(Arc::new(StaticDatasource::new())));
    assert_eq!(strategy.execute(None).unwrap_err(), StrategyError::ClusterStateNotDefined);
}

#[test]
fn test_stale_model_is_fatal_and_telemetry_is_not_read() {
    let model = two_host_model(large());
    model.set_stale(true);
    let datasource = telemetry(&[("A", 70.0), ("B", 20.0)]);
    let recorder = datasource.clone();

    assert_eq!(run(model, datasource).unwrap_err(), StrategyError::ClusterStateStale);
    assert!(recorder.queries().is_empty());
}

#[test]
fn test_shared_model_is_not_modified_by_a_run() {
    let model = two_host_model(large());
    let solution = run(model.clone(), telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();

    assert_eq!(solution.len(), 1);
    assert_eq!(model.host_of(&WorkloadId::new("W")), Some(HostId::new("A")));
    assert!(model.pending_moves().is_empty());
}

#[test]
fn test_strategy_can_run_again_on_a_fresh_model() {
    let mut strategy = OutletTempControl::new(OutletTempConfig::default(), StrategyDependencies::new(Arc::new(telemetry(&[("A", 70.0), ("B", 20.0)]))));

    let first = strategy.execute(Some(two_host_model(large()))).unwrap();
    let second = strategy.execute(Some(two_host_model(large()))).unwrap();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_ne!(first.id(), second.id());
}

#[test]
fn test_ceilometer_queries_a_trailing_period() {
    let datasource = telemetry(&[("A", 70.0), ("B", 20.0)]);
    let recorder = datasource.clone();
    run(two_host_model(large()), datasource).unwrap();

    for query in recorder.queries() {
        assert_eq!(query.metric_name, METRIC);
        assert_eq!(query.aggregation, Aggregation::Avg);
        assert_eq!(query.window, AggregationWindow::TrailingPeriod { period: Duration::seconds(30) });
    }
}

#[test]
fn test_gnocchi_queries_an_explicit_window_ending_now() {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let datasource = telemetry(&[("A", 70.0), ("B", 20.0)]);
    let recorder = datasource.clone();
    let dependencies = StrategyDependencies::new(Arc::new(datasource)).with_clock(Arc::new(MockClock::new(now)));
    let config = OutletTempConfig { datasource: DatasourceType::Gnocchi, period: Duration::seconds(600), ..OutletTempConfig::default() };

    let solution = OutletTempControl::new(config, dependencies).execute(Some(two_host_model(large()))).unwrap();

    assert_eq!(solution.len(), 1);
    let queries = recorder.queries();
    assert_eq!(queries.len(), 2);
    for query in queries {
        assert_eq!(query.aggregation, Aggregation::Mean);
        assert_eq!(query.window, AggregationWindow::Explicit { start: now - Duration::seconds(600), stop: now, granularity: Duration::seconds(300) });
    }
}

#[test]
fn test_gnocchi_period_reaching_before_the_calendar_fails_the_run() {
    let datasource = telemetry(&[("A", 70.0), ("B", 20.0)]);
    let recorder = datasource.clone();
    let parameters = json!({"datasource": "gnocchi", "period": 1.0e13});
    let mut strategy = OutletTempControl::from_parameters(parameters.as_object().unwrap(), StrategyDependencies::new(Arc::new(datasource))).unwrap();

    let err = strategy.execute(Some(two_host_model(large()))).unwrap_err();

    assert!(matches!(err, StrategyError::Config(ConfigError::InvalidValue { ref name, .. }) if name == "period"));
    assert!(recorder.queries().is_empty());
}

#[test]
fn test_largest_active_selection() {
    let model = ClusterModel::new();
    host(&model, "A", large());
    host(&model, "B", large());
    workload(&model, "W-small", small(), WorkloadState::Active, "A");
    workload(&model, "W-big", ResourceVector::new(8, 16384, 100), WorkloadState::Active, "A");

    let config = OutletTempConfig { workload_selection: WorkloadSelection::LargestActive, ..OutletTempConfig::default() };
    let solution = run_with(config, model, telemetry(&[("A", 70.0), ("B", 20.0)])).unwrap();

    assert_single_migration(&solution, "W-big", "A", "B");
}

/// Datasource that deletes a workload from the shared model while answering, like a collector
/// catching a deletion mid-run.
#[derive(Debug)]
struct VanishingDatasource {
    inner: StaticDatasource,
    model: ClusterModel,
    victim: WorkloadId,
}

impl Datasource for VanishingDatasource {
    fn get_name(&self) -> &str {
        "vanishing"
    }

    fn statistic_aggregation(&self, resource_id: &str, metric_name: &str, window: &AggregationWindow, aggregation: Aggregation) -> Option<f64> {
        self.model.remove_workload(&self.victim);
        self.inner.statistic_aggregation(resource_id, metric_name, window, aggregation)
    }
}

#[test]
fn test_workload_removed_during_the_run_is_skipped() {
    let model = two_host_model(large());
    workload(&model, "W2", small(), WorkloadState::Active, "A");
    let datasource = VanishingDatasource { inner: telemetry(&[("A", 70.0), ("B", 20.0)]), model: model.clone(), victim: WorkloadId::new("W") };

    let mut strategy = OutletTempControl::new(OutletTempConfig::default(), StrategyDependencies::new(Arc::new(datasource)));
    let solution = strategy.execute(Some(model)).unwrap();

    assert_single_migration(&solution, "W2", "A", "B");
}
