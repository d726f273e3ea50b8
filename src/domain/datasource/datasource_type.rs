use std::fmt;
use std::str::FromStr;

use chrono::Duration;

use crate::domain::clock::clock::Clock;
use crate::domain::datasource::datasource_trait::{Aggregation, AggregationWindow};
use crate::error::{ConfigError, ConversionError};

/// Telemetry backends a strategy can be configured for. The backend instance itself is injected;
/// this enum only decides metric names, aggregation and window shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatasourceType {
    /// Accepts a trailing period.
    #[default]
    Ceilometer,
    /// Needs an explicit start/stop/granularity window.
    Gnocchi,
}

impl DatasourceType {
    pub const CHOICES: [&'static str; 2] = ["ceilometer", "gnocchi"];

    /// Meter reporting the outlet (exhaust air) temperature of a host.
    pub fn host_outlet_temp_metric(&self) -> &'static str {
        match self {
            DatasourceType::Ceilometer | DatasourceType::Gnocchi => "hardware.ipmi.node.outlet_temperature",
        }
    }

    pub fn aggregation(&self) -> Aggregation {
        match self {
            DatasourceType::Ceilometer => Aggregation::Avg,
            DatasourceType::Gnocchi => Aggregation::Mean,
        }
    }

    /// Fails if the window would start before the earliest representable instant.
    pub fn build_window(&self, period: Duration, granularity: Duration, clock: &dyn Clock) -> Result<AggregationWindow, ConfigError> {
        match self {
            DatasourceType::Ceilometer => Ok(AggregationWindow::TrailingPeriod { period }),
            DatasourceType::Gnocchi => {
                let stop = clock.now();
                let start = stop.checked_sub_signed(period).ok_or_else(|| ConfigError::InvalidValue {
                    name: "period".to_string(),
                    reason: format!("a window of {} seconds ending at {} is out of range", period.num_seconds(), stop),
                })?;
                Ok(AggregationWindow::Explicit { start, stop, granularity })
            }
        }
    }
}

impl FromStr for DatasourceType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ceilometer" => Ok(DatasourceType::Ceilometer),
            "gnocchi" => Ok(DatasourceType::Gnocchi),
            _ => Err(ConversionError::UnknownDatasourceType(s.to_string())),
        }
    }
}

impl fmt::Display for DatasourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasourceType::Ceilometer => write!(f, "ceilometer"),
            DatasourceType::Gnocchi => write!(f, "gnocchi"),
        }
    }
}
