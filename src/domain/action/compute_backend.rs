use crate::domain::utils::id::{HostId, ResourceId};
use crate::error::ActionError;

/// Mechanism that actually performs changes on the infrastructure. Supplied by the execution
/// engine; the decision core only calls it through materialized actions.
pub trait ComputeBackend: std::fmt::Debug {
    fn live_migrate(&mut self, workload: &ResourceId, source: &HostId, destination: &HostId) -> Result<(), ActionError>;

    fn cold_migrate(&mut self, workload: &ResourceId, source: &HostId, destination: &HostId) -> Result<(), ActionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    LiveMigrate { workload: ResourceId, source: HostId, destination: HostId },
    ColdMigrate { workload: ResourceId, source: HostId, destination: HostId },
}

/// Backend that performs nothing and records the calls it receives. Used for dry runs.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    pub calls: Vec<BackendCall>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComputeBackend for RecordingBackend {
    fn live_migrate(&mut self, workload: &ResourceId, source: &HostId, destination: &HostId) -> Result<(), ActionError> {
        self.calls.push(BackendCall::LiveMigrate { workload: workload.clone(), source: source.clone(), destination: destination.clone() });
        Ok(())
    }

    fn cold_migrate(&mut self, workload: &ResourceId, source: &HostId, destination: &HostId) -> Result<(), ActionError> {
        self.calls.push(BackendCall::ColdMigrate { workload: workload.clone(), source: source.clone(), destination: destination.clone() });
        Ok(())
    }
}
