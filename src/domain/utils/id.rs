use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// String identity tagged with the kind of entity it names, so a `HostId` can never be passed
/// where a `WorkloadId` is expected.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T> {
    pub id: String,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    pub fn new(id: impl Into<String>) -> Self {
        Id { id: id.into(), _marker: PhantomData }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> From<Id<T>> for String {
    fn from(id_wrapper: Id<T>) -> Self {
        id_wrapper.id
    }
}

impl<T> From<&str> for Id<T> {
    fn from(id: &str) -> Self {
        Id::new(id)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full_name = std::any::type_name::<T>();
        let clean_name = full_name.split("::").last().unwrap_or(full_name);
        let display_name = clean_name.replace("Tag", "Id");

        write!(f, "{}: {:?}", display_name, self.id)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy, Default)]
pub struct HostTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy, Default)]
pub struct WorkloadTag;
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Copy, Default)]
pub struct ResourceTag;

pub type HostId = Id<HostTag>;
pub type WorkloadId = Id<WorkloadTag>;

/// Scope an action applies to. Migrations target a workload, but the descriptor stays generic.
pub type ResourceId = Id<ResourceTag>;

impl From<&WorkloadId> for ResourceId {
    fn from(workload_id: &WorkloadId) -> Self {
        ResourceId::new(workload_id.id.clone())
    }
}

impl From<&HostId> for ResourceId {
    fn from(host_id: &HostId) -> Self {
        ResourceId::new(host_id.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_names_the_id_kind() {
        let host = HostId::new("compute-1");
        assert_eq!(format!("{:?}", host), "HostId: \"compute-1\"");
        assert_eq!(host.to_string(), "compute-1");
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let workload = WorkloadId::new("vm-42");
        let json = serde_json::to_string(&workload).unwrap();
        assert_eq!(json, "\"vm-42\"");

        let back: WorkloadId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, workload);
    }
}
