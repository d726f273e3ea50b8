use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

/// Amount of compute, memory and disk. Used both for host capacity and for workload demand.
///
/// Values are signed so that an over-committed host reports a negative spare capacity instead of
/// wrapping around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceVector {
    pub vcpus: i64,
    pub memory_mb: i64,
    pub disk_gb: i64,
}

impl ResourceVector {
    pub fn new(vcpus: i64, memory_mb: i64, disk_gb: i64) -> Self {
        Self { vcpus, memory_mb, disk_gb }
    }

    /// True if no dimension is below zero.
    pub fn is_non_negative(&self) -> bool {
        self.vcpus >= 0 && self.memory_mb >= 0 && self.disk_gb >= 0
    }

    /// True if `demand` fits into `self` on every dimension.
    pub fn can_accommodate(&self, demand: &ResourceVector) -> bool {
        (*self - *demand).is_non_negative()
    }

    /// Scalar size used to rank workloads by demand: compute first, then memory, then disk.
    pub fn size_key(&self) -> (i64, i64, i64) {
        (self.vcpus, self.memory_mb, self.disk_gb)
    }
}

impl Add for ResourceVector {
    type Output = ResourceVector;

    fn add(self, rhs: ResourceVector) -> ResourceVector {
        ResourceVector {
            vcpus: self.vcpus + rhs.vcpus,
            memory_mb: self.memory_mb + rhs.memory_mb,
            disk_gb: self.disk_gb + rhs.disk_gb,
        }
    }
}

impl AddAssign for ResourceVector {
    fn add_assign(&mut self, rhs: ResourceVector) {
        *self = *self + rhs;
    }
}

impl Sub for ResourceVector {
    type Output = ResourceVector;

    fn sub(self, rhs: ResourceVector) -> ResourceVector {
        ResourceVector {
            vcpus: self.vcpus - rhs.vcpus,
            memory_mb: self.memory_mb - rhs.memory_mb,
            disk_gb: self.disk_gb - rhs.disk_gb,
        }
    }
}

impl Sum for ResourceVector {
    fn sum<I: Iterator<Item = ResourceVector>>(iter: I) -> Self {
        iter.fold(ResourceVector::default(), |acc, r| acc + r)
    }
}
