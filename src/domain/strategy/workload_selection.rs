use std::fmt;
use std::str::FromStr;

use crate::domain::cluster::workload::Workload;
use crate::error::ConversionError;

/// How a strategy picks the workload to move off a host, among that host's active workloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WorkloadSelection {
    /// First active workload in placement order.
    #[default]
    FirstActive,
    /// Active workload with the largest demand, compared by vcpus, memory, disk.
    LargestActive,
    SmallestActive,
}

impl WorkloadSelection {
    pub const CHOICES: [&'static str; 3] = ["first_active", "largest_active", "smallest_active"];

    /// Picks from candidates that are already known to be active. Ties go to the earlier one.
    /// `FirstActive` stops at the first candidate, so a lazy iterator is not consumed further.
    pub fn select<I>(&self, mut candidates: I) -> Option<Workload>
    where
        I: Iterator<Item = Workload>,
    {
        match self {
            WorkloadSelection::FirstActive => candidates.next(),
            WorkloadSelection::LargestActive => candidates.reduce(|best, w| if w.demand.size_key() > best.demand.size_key() { w } else { best }),
            WorkloadSelection::SmallestActive => candidates.min_by_key(|w| w.demand.size_key()),
        }
    }
}

impl FromStr for WorkloadSelection {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_active" => Ok(WorkloadSelection::FirstActive),
            "largest_active" => Ok(WorkloadSelection::LargestActive),
            "smallest_active" => Ok(WorkloadSelection::SmallestActive),
            _ => Err(ConversionError::UnknownWorkloadSelection(s.to_string())),
        }
    }
}

impl fmt::Display for WorkloadSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadSelection::FirstActive => write!(f, "first_active"),
            WorkloadSelection::LargestActive => write!(f, "largest_active"),
            WorkloadSelection::SmallestActive => write!(f, "smallest_active"),
        }
    }
}
