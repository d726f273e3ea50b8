use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::api::telemetry_dto::TelemetryDto;
use crate::domain::datasource::datasource_trait::{Aggregation, AggregationWindow, Datasource};

/// One call received by a `StaticDatasource`.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasourceQuery {
    pub resource_id: String,
    pub metric_name: String,
    pub window: AggregationWindow,
    pub aggregation: Aggregation,
}

/// In-memory datasource serving pre-aggregated samples regardless of the requested window.
/// Every query is recorded so callers can inspect what was asked.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasource {
    samples: HashMap<(String, String), f64>,
    queries: Arc<Mutex<Vec<DatasourceQuery>>>,
}

impl StaticDatasource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sample(mut self, resource_id: impl Into<String>, metric_name: impl Into<String>, value: f64) -> Self {
        self.insert(resource_id, metric_name, value);
        self
    }

    pub fn insert(&mut self, resource_id: impl Into<String>, metric_name: impl Into<String>, value: f64) {
        self.samples.insert((resource_id.into(), metric_name.into()), value);
    }

    pub fn queries(&self) -> Vec<DatasourceQuery> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl From<TelemetryDto> for StaticDatasource {
    fn from(dto: TelemetryDto) -> Self {
        let mut datasource = StaticDatasource::new();
        for metric in dto.metrics {
            for (resource_id, value) in metric.samples {
                datasource.insert(resource_id, metric.metric_name.clone(), value);
            }
        }
        datasource
    }
}

impl Datasource for StaticDatasource {
    fn get_name(&self) -> &str {
        "static"
    }

    fn statistic_aggregation(&self, resource_id: &str, metric_name: &str, window: &AggregationWindow, aggregation: Aggregation) -> Option<f64> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).push(DatasourceQuery {
            resource_id: resource_id.to_string(),
            metric_name: metric_name.to_string(),
            window: window.clone(),
            aggregation,
        });
        self.samples.get(&(resource_id.to_string(), metric_name.to_string())).copied()
    }
}
