use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Aggregation function applied by the telemetry backend over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Avg,
    Mean,
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Avg => write!(f, "avg"),
            Aggregation::Mean => write!(f, "mean"),
        }
    }
}

/// Time window of a statistic query. Backends differ in the shape they accept; a strategy
/// builds whichever shape its configured backend needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregationWindow {
    /// The backend aggregates the trailing `period` ending now.
    TrailingPeriod { period: Duration },

    /// The backend aggregates `[start, stop]`, bucketed by `granularity`.
    Explicit { start: DateTime<Utc>, stop: DateTime<Utc>, granularity: Duration },
}

impl AggregationWindow {
    /// Length of time the window covers.
    pub fn span(&self) -> Duration {
        match self {
            AggregationWindow::TrailingPeriod { period } => *period,
            AggregationWindow::Explicit { start, stop, .. } => *stop - *start,
        }
    }
}

/// Telemetry source returning one scalar aggregate per resource and window.
///
/// `None` means the backend holds no sample for the resource. Calls are blocking and carry no
/// timeout at this layer.
pub trait Datasource: fmt::Debug + Send + Sync {
    fn get_name(&self) -> &str;

    fn statistic_aggregation(&self, resource_id: &str, metric_name: &str, window: &AggregationWindow, aggregation: Aggregation) -> Option<f64>;
}
