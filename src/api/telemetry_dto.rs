use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pre-aggregated samples, one scalar per resource and metric. Feeds the in-memory datasource.
#[derive(Debug, Deserialize, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryDto {
    pub metrics: Vec<MetricSamplesDto>,
}

#[derive(Debug, Deserialize, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSamplesDto {
    pub metric_name: String,
    /// resource id -> aggregated value
    pub samples: BTreeMap<String, f64>,
}
