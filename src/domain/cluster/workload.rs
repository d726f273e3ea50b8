use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::cluster::resources::ResourceVector;
use crate::domain::utils::id::WorkloadId;
use crate::error::ConversionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkloadState {
    Active,
    Building,
    Paused,
    Suspended,
    Stopped,
    Rescued,
    Resized,
    SoftDeleted,
    Deleted,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workload {
    pub id: WorkloadId,
    pub demand: ResourceVector,
    pub state: WorkloadState,
}

impl Workload {
    pub fn new(id: WorkloadId, demand: ResourceVector, state: WorkloadState) -> Self {
        Self { id, demand, state }
    }

    /// Only running workloads can be live migrated.
    pub fn is_migration_candidate(&self) -> bool {
        self.state == WorkloadState::Active
    }
}

impl FromStr for WorkloadState {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(WorkloadState::Active),
            "building" => Ok(WorkloadState::Building),
            "paused" => Ok(WorkloadState::Paused),
            "suspended" => Ok(WorkloadState::Suspended),
            "stopped" => Ok(WorkloadState::Stopped),
            "rescued" => Ok(WorkloadState::Rescued),
            "resized" => Ok(WorkloadState::Resized),
            "soft_deleted" | "soft-delete" => Ok(WorkloadState::SoftDeleted),
            "deleted" => Ok(WorkloadState::Deleted),
            "error" => Ok(WorkloadState::Error),
            _ => Err(ConversionError::UnknownWorkloadState(s.to_string())),
        }
    }
}

impl fmt::Display for WorkloadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadState::Active => "active",
            WorkloadState::Building => "building",
            WorkloadState::Paused => "paused",
            WorkloadState::Suspended => "suspended",
            WorkloadState::Stopped => "stopped",
            WorkloadState::Rescued => "rescued",
            WorkloadState::Resized => "resized",
            WorkloadState::SoftDeleted => "soft_deleted",
            WorkloadState::Deleted => "deleted",
            WorkloadState::Error => "error",
        };
        write!(f, "{}", name)
    }
}
