use thiserror::Error;

use crate::domain::utils::id::{HostId, WorkloadId};

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON input: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to build cluster model: {0}")]
    ClusterConstructionError(#[from] ClusterError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Strategy(#[from] StrategyError),

    #[error(transparent)]
    Action(#[from] ActionError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures while turning external strings into domain enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("Unknown strategy type: '{0}'")]
    UnknownStrategyType(String),

    #[error("Unknown datasource type: '{0}'")]
    UnknownDatasourceType(String),

    #[error("Unknown workload selection policy: '{0}'")]
    UnknownWorkloadSelection(String),

    #[error("Unknown host status: '{0}'")]
    UnknownHostStatus(String),

    #[error("Unknown host availability: '{0}'")]
    UnknownHostAvailability(String),

    #[error("Unknown workload state: '{0}'")]
    UnknownWorkloadState(String),

    #[error("Unknown migration type: '{0}'")]
    UnknownMigrationType(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("Cluster model is not ready: staleness has not been checked")]
    NotReady,

    #[error("Cluster model is stale")]
    Stale,

    #[error("Host {0} not found in cluster model")]
    HostNotFound(HostId),

    #[error("Workload {0} not found in cluster model")]
    WorkloadNotFound(WorkloadId),

    #[error("Workload {workload} is not hosted on {host}")]
    WorkloadNotOnHost { workload: WorkloadId, host: HostId },

    #[error("Host {0} is already part of the cluster model")]
    DuplicateHost(HostId),

    #[error("Workload {0} is already part of the cluster model")]
    DuplicateWorkload(WorkloadId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    #[error("Option '{name}' must be of type {expected}, got {found}")]
    MistypedOption { name: String, expected: String, found: String },

    #[error("Required option '{0}' is missing")]
    MissingOption(String),

    #[error("Option '{name}' has value '{value}', expected one of {choices:?}")]
    InvalidChoice { name: String, value: String, choices: Vec<String> },

    #[error("Option '{name}' is invalid: {reason}")]
    InvalidValue { name: String, reason: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolutionError {
    #[error("Solution {0} is frozen, no further actions can be added")]
    Frozen(uuid::Uuid),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("No cluster state defined")]
    ClusterStateNotDefined,

    #[error("Cluster state is stale")]
    ClusterStateStale,

    #[error("Strategy configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Solution(#[from] SolutionError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("No such action type: '{0}'")]
    NoSuchActionType(String),

    #[error("Action type '{0}' is already registered")]
    DuplicateActionType(String),

    #[error("Action '{action_type}' is missing parameter '{parameter}'")]
    MissingParameter { action_type: String, parameter: String },

    #[error("Action '{action_type}' has invalid parameter '{parameter}': {reason}")]
    InvalidParameter { action_type: String, parameter: String, reason: String },

    #[error("Action '{0}' has not been bound to a descriptor")]
    NotBound(String),

    #[error("Execution backend failed: {0}")]
    Backend(String),
}
