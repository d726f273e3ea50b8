use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::cluster::host::Host;
use crate::domain::cluster::pending_moves::PendingMove;
use crate::domain::cluster::resources::ResourceVector;
use crate::domain::cluster::workload::Workload;
use crate::domain::utils::id::{HostId, WorkloadId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostSnapshot {
    pub host: Host,
    pub workloads: Vec<Workload>,
}

impl HostSnapshot {
    pub fn used_capacity(&self) -> ResourceVector {
        self.workloads.iter().map(|w| w.demand).sum()
    }

    pub fn spare_capacity(&self) -> ResourceVector {
        self.host.capacity - self.used_capacity()
    }
}

/// Frozen copy of the effective placement (base state plus pending moves) at the end of a run.
/// Attached to a `Solution` for audit, detached from any later change of the live model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub stale: bool,
    pub hosts: Vec<HostSnapshot>,
    pub pending_moves: Vec<PendingMove>,
}

impl ClusterSnapshot {
    pub fn host(&self, host_id: &HostId) -> Option<&HostSnapshot> {
        self.hosts.iter().find(|h| &h.host.id == host_id)
    }

    /// The host a workload is placed on in this snapshot.
    pub fn host_of(&self, workload_id: &WorkloadId) -> Option<&HostId> {
        self.hosts.iter().find(|h| h.workloads.iter().any(|w| &w.id == workload_id)).map(|h| &h.host.id)
    }

    pub fn workload_count(&self) -> usize {
        self.hosts.iter().map(|h| h.workloads.len()).sum()
    }
}

impl fmt::Display for ClusterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cluster ({} hosts, {} workloads, {} pending moves)", self.hosts.len(), self.workload_count(), self.pending_moves.len())?;
        for host in &self.hosts {
            let spare = host.spare_capacity();
            writeln!(
                f,
                "  {} [{} / {}] spare vcpus={} memory_mb={} disk_gb={}",
                host.host.id, host.host.status, host.host.availability, spare.vcpus, spare.memory_mb, spare.disk_gb
            )?;
            for workload in &host.workloads {
                writeln!(f, "    {} ({})", workload.id, workload.state)?;
            }
        }
        Ok(())
    }
}
