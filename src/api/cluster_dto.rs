use serde::{Deserialize, Serialize};

fn default_status() -> String {
    "enabled".to_string()
}

fn default_state() -> String {
    "up".to_string()
}

/// Cluster state as delivered by the collector.
#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDto {
    #[serde(default)]
    pub stale: bool,
    pub hosts: Vec<HostDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostDto {
    pub id: String,
    #[serde(default)]
    pub hostname: Option<String>,
    pub vcpus: i64,
    pub memory_mb: i64,
    pub disk_gb: i64,
    /// Administrative status, `enabled` or `disabled`.
    #[serde(default = "default_status")]
    pub status: String,
    /// Service availability, `up`/`online` or `down`/`offline`.
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default)]
    pub workloads: Vec<WorkloadDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDto {
    pub id: String,
    pub vcpus: i64,
    pub memory_mb: i64,
    pub disk_gb: i64,
    pub state: String,
}
