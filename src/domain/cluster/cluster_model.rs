use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use slotmap::{SecondaryMap, SlotMap, new_key_type};

use crate::api::cluster_dto::ClusterDto;
use crate::domain::cluster::host::{Host, HostAvailability, HostStatus};
use crate::domain::cluster::pending_moves::{PendingMove, PendingMoves};
use crate::domain::cluster::resources::ResourceVector;
use crate::domain::cluster::snapshot::{ClusterSnapshot, HostSnapshot};
use crate::domain::cluster::workload::{Workload, WorkloadState};
use crate::domain::utils::id::{HostId, WorkloadId};
use crate::error::{ClusterError, Error};

new_key_type! {
    pub struct HostKey;
    pub struct WorkloadKey;
}

#[derive(Debug, Default)]
struct ModelInner {
    hosts: SlotMap<HostKey, Host>,
    workloads: SlotMap<WorkloadKey, Workload>,

    host_index: HashMap<HostId, HostKey>,
    workload_index: HashMap<WorkloadId, WorkloadKey>,

    /// Hosts in the order the collector added them. Slot order is not insertion order once
    /// slots get reused.
    host_order: Vec<HostKey>,

    /// Host -> hosted workloads, in the order they were placed.
    placement: SecondaryMap<HostKey, Vec<WorkloadKey>>,
    location: SecondaryMap<WorkloadKey, HostKey>,

    stale: bool,
}

impl ModelInner {
    fn base_workload_ids(&self, host_key: HostKey) -> Vec<WorkloadId> {
        self.placement
            .get(host_key)
            .map(|keys| keys.iter().filter_map(|key| self.workloads.get(*key)).map(|w| w.id.clone()).collect())
            .unwrap_or_default()
    }

    fn base_host_of(&self, workload_id: &WorkloadId) -> Option<HostId> {
        let workload_key = self.workload_index.get(workload_id)?;
        let host_key = self.location.get(*workload_key)?;
        self.hosts.get(*host_key).map(|h| h.id.clone())
    }
}

/// In-memory model of hosts and the workloads they run.
///
/// The collector owns the shared state behind the `Arc`; every clone is a handle onto the same
/// hosts and workloads. Moves planned by a strategy go into the handle's own `PendingMoves`
/// overlay, so they are visible to later queries on that handle only.
#[derive(Debug, Clone)]
pub struct ClusterModel {
    inner: Arc<RwLock<ModelInner>>,
    pending: PendingMoves,
    freshness_checked: bool,
}

impl Default for ClusterModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterModel {
    pub fn new() -> Self {
        Self { inner: Arc::new(RwLock::new(ModelInner::default())), pending: PendingMoves::new(), freshness_checked: false }
    }

    fn read(&self) -> RwLockReadGuard<'_, ModelInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ModelInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    //--------------------------
    // --- Collector Methods ---
    //--------------------------
    pub fn add_host(&self, host: Host) -> Result<(), ClusterError> {
        let mut guard = self.write();
        if guard.host_index.contains_key(&host.id) {
            return Err(ClusterError::DuplicateHost(host.id));
        }

        let host_id = host.id.clone();
        let key = guard.hosts.insert(host);
        guard.host_index.insert(host_id, key);
        guard.host_order.push(key);
        guard.placement.insert(key, Vec::new());
        Ok(())
    }

    pub fn add_workload(&self, workload: Workload, host_id: &HostId) -> Result<(), ClusterError> {
        let mut guard = self.write();
        if guard.workload_index.contains_key(&workload.id) {
            return Err(ClusterError::DuplicateWorkload(workload.id));
        }
        let host_key = *guard.host_index.get(host_id).ok_or_else(|| ClusterError::HostNotFound(host_id.clone()))?;

        let workload_id = workload.id.clone();
        let key = guard.workloads.insert(workload);
        guard.workload_index.insert(workload_id, key);
        guard.location.insert(key, host_key);
        if let Some(hosted) = guard.placement.get_mut(host_key) {
            hosted.push(key);
        }
        Ok(())
    }

    /// Drops a workload from the shared state, e.g. because it was deleted in the cloud.
    pub fn remove_workload(&self, workload_id: &WorkloadId) -> Option<Workload> {
        let mut guard = self.write();
        let key = guard.workload_index.remove(workload_id)?;
        if let Some(host_key) = guard.location.remove(key) {
            if let Some(hosted) = guard.placement.get_mut(host_key) {
                hosted.retain(|k| *k != key);
            }
        }
        guard.workloads.remove(key)
    }

    pub fn set_stale(&self, stale: bool) {
        self.write().stale = stale;
    }

    pub fn is_stale(&self) -> bool {
        self.read().stale
    }

    /// Checks the staleness flag and, if the model is fresh, unlocks `plan_move` on this handle.
    pub fn ensure_fresh(&mut self) -> Result<(), ClusterError> {
        if self.is_stale() {
            self.freshness_checked = false;
            return Err(ClusterError::Stale);
        }
        self.freshness_checked = true;
        Ok(())
    }

    //----------------------
    // --- Query Methods ---
    //----------------------
    pub fn get_host(&self, host_id: &HostId) -> Option<Host> {
        let guard = self.read();
        let key = guard.host_index.get(host_id)?;
        guard.hosts.get(*key).cloned()
    }

    pub fn get_workload(&self, workload_id: &WorkloadId) -> Option<Workload> {
        let guard = self.read();
        let key = guard.workload_index.get(workload_id)?;
        guard.workloads.get(*key).cloned()
    }

    pub fn all_hosts(&self) -> Vec<Host> {
        let guard = self.read();
        guard.host_order.iter().filter_map(|key| guard.hosts.get(*key)).cloned().collect()
    }

    /// Hosts that are online and enabled, in the order the collector added them.
    pub fn eligible_hosts(&self) -> Vec<Host> {
        self.all_hosts().into_iter().filter(Host::is_eligible).collect()
    }

    pub fn host_count(&self) -> usize {
        self.read().hosts.len()
    }

    pub fn workload_count(&self) -> usize {
        self.read().workloads.len()
    }

    /// Host a workload is on once the pending moves of this handle are applied.
    pub fn host_of(&self, workload_id: &WorkloadId) -> Option<HostId> {
        let guard = self.read();
        self.effective_host_of(&guard, workload_id)
    }

    fn effective_host_of(&self, guard: &ModelInner, workload_id: &WorkloadId) -> Option<HostId> {
        if !guard.workload_index.contains_key(workload_id) {
            return None;
        }
        match self.pending.latest_destination(workload_id) {
            Some(destination) => Some(destination.clone()),
            None => guard.base_host_of(workload_id),
        }
    }

    /// Ids of the workloads on `host_id`, pending moves applied. Base placement order first,
    /// then workloads moved in by this run in planning order.
    pub fn hosted_workload_ids(&self, host_id: &HostId) -> Result<Vec<WorkloadId>, ClusterError> {
        let guard = self.read();
        let host_key = *guard.host_index.get(host_id).ok_or_else(|| ClusterError::HostNotFound(host_id.clone()))?;

        let mut hosted: Vec<WorkloadId> = guard
            .base_workload_ids(host_key)
            .into_iter()
            .filter(|id| self.pending.latest_destination(id).is_none_or(|destination| destination == host_id))
            .collect();

        for inbound in self.pending.inbound(host_id) {
            if !hosted.contains(inbound) {
                hosted.push(inbound.clone());
            }
        }
        Ok(hosted)
    }

    /// Workloads on `host_id`, pending moves applied. Workloads removed from the shared state
    /// in the meantime are left out.
    pub fn hosted_workloads(&self, host_id: &HostId) -> Result<Vec<Workload>, ClusterError> {
        let ids = self.hosted_workload_ids(host_id)?;
        let guard = self.read();
        Ok(ids.iter().filter_map(|id| guard.workload_index.get(id).and_then(|key| guard.workloads.get(*key))).cloned().collect())
    }

    pub fn used_capacity(&self, host_id: &HostId) -> Result<ResourceVector, ClusterError> {
        Ok(self.hosted_workloads(host_id)?.iter().map(|w| w.demand).sum())
    }

    pub fn spare_capacity(&self, host_id: &HostId) -> Result<ResourceVector, ClusterError> {
        let host = self.get_host(host_id).ok_or_else(|| ClusterError::HostNotFound(host_id.clone()))?;
        Ok(host.capacity - self.used_capacity(host_id)?)
    }

    //----------------------------
    // --- Speculative Updates ---
    //----------------------------

    /// Records that `workload_id` is planned to move from `source` to `destination`.
    ///
    /// Only the overlay of this handle changes. Requires a prior successful `ensure_fresh`.
    pub fn plan_move(&mut self, workload_id: &WorkloadId, source: &HostId, destination: &HostId) -> Result<(), ClusterError> {
        if !self.freshness_checked {
            return Err(ClusterError::NotReady);
        }

        {
            let guard = self.read();
            if guard.stale {
                return Err(ClusterError::Stale);
            }
            for host_id in [source, destination] {
                if !guard.host_index.contains_key(host_id) {
                    return Err(ClusterError::HostNotFound(host_id.clone()));
                }
            }
            match self.effective_host_of(&guard, workload_id) {
                None => return Err(ClusterError::WorkloadNotFound(workload_id.clone())),
                Some(current) if &current != source => {
                    return Err(ClusterError::WorkloadNotOnHost { workload: workload_id.clone(), host: source.clone() });
                }
                Some(_) => {}
            }
        }

        log::debug!("Planned move of {} from {} to {}", workload_id, source, destination);
        self.pending.push(PendingMove { workload: workload_id.clone(), source: source.clone(), destination: destination.clone() });
        Ok(())
    }

    pub fn pending_moves(&self) -> &[PendingMove] {
        self.pending.moves()
    }

    /// Frozen copy of the effective placement of this handle.
    pub fn snapshot(&self) -> ClusterSnapshot {
        let hosts = self
            .all_hosts()
            .into_iter()
            .map(|host| {
                let workloads = self.hosted_workloads(&host.id).unwrap_or_default();
                HostSnapshot { host, workloads }
            })
            .collect();

        ClusterSnapshot { stale: self.is_stale(), hosts, pending_moves: self.pending.moves().to_vec() }
    }
}

impl TryFrom<ClusterDto> for ClusterModel {
    type Error = Error;

    fn try_from(dto: ClusterDto) -> Result<Self, Self::Error> {
        let model = ClusterModel::new();

        for host_dto in dto.hosts {
            let host_id = HostId::new(host_dto.id);
            let mut host = Host::new(host_id.clone(), ResourceVector::new(host_dto.vcpus, host_dto.memory_mb, host_dto.disk_gb))
                .with_status(HostStatus::from_str(&host_dto.status)?)
                .with_availability(HostAvailability::from_str(&host_dto.state)?);
            if let Some(hostname) = host_dto.hostname {
                host.hostname = hostname;
            }
            model.add_host(host)?;

            for workload_dto in host_dto.workloads {
                let workload = Workload::new(
                    WorkloadId::new(workload_dto.id),
                    ResourceVector::new(workload_dto.vcpus, workload_dto.memory_mb, workload_dto.disk_gb),
                    WorkloadState::from_str(&workload_dto.state)?,
                );
                model.add_workload(workload, &host_id)?;
            }
        }

        model.set_stale(dto.stale);
        Ok(model)
    }
}
