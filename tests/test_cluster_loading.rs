use decision_engine::api::cluster_dto::{ClusterDto, HostDto, WorkloadDto};
use decision_engine::decide;
use decision_engine::domain::action::action_registry::ActionRegistry;
use decision_engine::domain::action::migrate::{DESTINATION_NODE, SOURCE_NODE};
use decision_engine::domain::cluster::{cluster_model::ClusterModel, host::HostStatus, resources::ResourceVector};
use decision_engine::domain::datasource::{
    datasource_trait::{Aggregation, AggregationWindow, Datasource},
    datasource_type::DatasourceType,
};
use decision_engine::domain::utils::id::{HostId, ResourceId, WorkloadId};
use decision_engine::error::{ConversionError, Error, StrategyError};
use decision_engine::loader::parser::{load_cluster_model, load_parameters, load_telemetry};

use chrono::Duration;
use serde_json::{Map, json};
use std::path::PathBuf;

fn data_file(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

fn host_dto(id: &str, workloads: Vec<WorkloadDto>) -> HostDto {
    HostDto {
        id: id.to_string(),
        hostname: None,
        vcpus: 8,
        memory_mb: 16384,
        disk_gb: 100,
        status: "enabled".to_string(),
        state: "up".to_string(),
        workloads,
    }
}

fn workload_dto(id: &str, state: &str) -> WorkloadDto {
    WorkloadDto { id: id.to_string(), vcpus: 2, memory_mb: 2048, disk_gb: 20, state: state.to_string() }
}

#[test]
fn test_load_sample_cluster() {
    let model = load_cluster_model(data_file("cluster.json")).unwrap();

    assert_eq!(model.host_count(), 4);
    assert_eq!(model.workload_count(), 4);
    assert!(!model.is_stale());
    assert_eq!(model.get_host(&HostId::new("compute-4")).unwrap().status, HostStatus::Disabled);
    assert_eq!(model.get_host(&HostId::new("compute-1")).unwrap().hostname, "compute-1.rack-a");
    assert_eq!(model.host_of(&WorkloadId::new("vm-web-2")), Some(HostId::new("compute-2")));
    assert_eq!(model.spare_capacity(&HostId::new("compute-1")).unwrap(), ResourceVector::new(18, 86016, 680));

    let eligible: Vec<String> = model.eligible_hosts().into_iter().map(|h| h.id.id).collect();
    assert_eq!(eligible, vec!["compute-1", "compute-2", "compute-3"]);
}

#[test]
fn test_decide_on_sample_data() {
    let parameters = load_parameters(data_file("parameters.json")).unwrap();
    let solution = decide(data_file("cluster.json"), data_file("telemetry.json"), "outlet_temperature", &parameters).unwrap();

    // compute-1 is hot; vm-stopped is skipped, vm-web-1 goes to the coolest eligible host.
    assert_eq!(solution.len(), 1);
    let action = &solution.actions()[0];
    assert_eq!(action.applies_to(), &ResourceId::new("vm-web-1"));
    assert_eq!(action.input_parameters()[SOURCE_NODE], json!("compute-1"));
    assert_eq!(action.input_parameters()[DESTINATION_NODE], json!("compute-3"));

    assert!(ActionRegistry::with_default_actions().materialize(action).is_ok());
}

#[test]
fn test_decide_with_unknown_strategy() {
    let result = decide(data_file("cluster.json"), data_file("telemetry.json"), "basic_consolidation", &Map::new());
    assert!(matches!(result, Err(Error::Conversion(ConversionError::UnknownStrategyType(_)))));
}

#[test]
fn test_sample_telemetry_covers_every_host() {
    let datasource = load_telemetry(data_file("telemetry.json")).unwrap();
    let window = AggregationWindow::TrailingPeriod { period: Duration::seconds(30) };
    let metric = DatasourceType::Ceilometer.host_outlet_temp_metric();

    for host in ["compute-1", "compute-2", "compute-3", "compute-4"] {
        assert!(datasource.statistic_aggregation(host, metric, &window, Aggregation::Avg).is_some());
    }
    assert_eq!(datasource.statistic_aggregation("compute-9", metric, &window, Aggregation::Avg), None);
    assert_eq!(datasource.queries().len(), 5);
}

#[test]
fn test_dummy_strategy_on_sample_data() {
    let solution = decide(data_file("cluster.json"), data_file("telemetry.json"), "dummy", &Map::new()).unwrap();

    assert_eq!(solution.strategy(), "dummy");
    assert_eq!(solution.len(), 1);
    assert_eq!(solution.actions()[0].applies_to(), &ResourceId::new("compute-1"));
}

#[test]
fn test_stale_cluster_is_loaded_but_refused() {
    let dto = ClusterDto { stale: true, hosts: vec![host_dto("h1", vec![workload_dto("w1", "active")])] };
    let model = ClusterModel::try_from(dto).unwrap();
    assert!(model.is_stale());

    let json = json!({"stale": true, "hosts": []});
    let path = std::env::temp_dir().join(format!("stale-cluster-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, json.to_string()).unwrap();
    let result = decide(&path, data_file("telemetry.json"), "outlet_temperature", &Map::new());
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(Error::Strategy(StrategyError::ClusterStateStale))));
}

#[test]
fn test_unknown_workload_state_is_rejected() {
    let dto = ClusterDto { stale: false, hosts: vec![host_dto("h1", vec![workload_dto("w1", "hibernating")])] };
    let result = ClusterModel::try_from(dto);
    assert!(matches!(result, Err(Error::Conversion(ConversionError::UnknownWorkloadState(_)))));
}

#[test]
fn test_duplicate_workload_is_rejected() {
    let dto = ClusterDto {
        stale: false,
        hosts: vec![host_dto("h1", vec![workload_dto("w1", "active")]), host_dto("h2", vec![workload_dto("w1", "active")])],
    };
    assert!(matches!(ClusterModel::try_from(dto), Err(Error::ClusterConstructionError(_))));
}
