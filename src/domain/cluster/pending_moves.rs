use serde::{Deserialize, Serialize};

use crate::domain::utils::id::{HostId, WorkloadId};

/// One tentative relocation recorded during a decision run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingMove {
    pub workload: WorkloadId,
    pub source: HostId,
    pub destination: HostId,
}

/// Append-only arena of tentative relation changes layered over the shared cluster state.
///
/// The shared placement is never touched by a strategy. Queries on a `ClusterModel` handle
/// combine the base placement with this overlay, and a later move of the same workload wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingMoves {
    moves: Vec<PendingMove>,
}

impl PendingMoves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, pending_move: PendingMove) {
        self.moves.push(pending_move);
    }

    pub fn moves(&self) -> &[PendingMove] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Destination of the most recent move of `workload`, if it was moved at all.
    pub fn latest_destination(&self, workload: &WorkloadId) -> Option<&HostId> {
        self.moves.iter().rev().find(|m| &m.workload == workload).map(|m| &m.destination)
    }

    /// Workloads whose most recent move ends on `host`, in the order they were planned.
    pub fn inbound(&self, host: &HostId) -> Vec<&WorkloadId> {
        let mut inbound: Vec<&WorkloadId> = Vec::new();
        for pending_move in &self.moves {
            if &pending_move.destination != host || inbound.contains(&&pending_move.workload) {
                continue;
            }
            if self.latest_destination(&pending_move.workload) == Some(host) {
                inbound.push(&pending_move.workload);
            }
        }
        inbound
    }
}
