use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::domain::strategy::config::ConfigSchema;
use crate::domain::strategy::dummy_strategy::{DUMMY, DummyConfig, DummyStrategy};
use crate::domain::strategy::outlet_temp_control::{OUTLET_TEMPERATURE, OutletTempConfig, OutletTempControl};
use crate::domain::strategy::strategy_trait::{Strategy, StrategyDependencies};
use crate::error::{ConversionError, StrategyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyType {
    OutletTemperature,
    Dummy,
}

impl StrategyType {
    pub fn get_schema(&self) -> ConfigSchema {
        match self {
            StrategyType::OutletTemperature => OutletTempConfig::schema(),
            StrategyType::Dummy => DummyConfig::schema(),
        }
    }

    /// Validates `parameters` against the strategy's schema and builds the strategy.
    pub fn get_instance(&self, parameters: &Map<String, Value>, dependencies: StrategyDependencies) -> Result<Box<dyn Strategy>, StrategyError> {
        match self {
            StrategyType::OutletTemperature => Ok(Box::new(OutletTempControl::from_parameters(parameters, dependencies)?)),
            StrategyType::Dummy => Ok(Box::new(DummyStrategy::from_parameters(parameters, dependencies)?)),
        }
    }
}

impl FromStr for StrategyType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            OUTLET_TEMPERATURE => Ok(StrategyType::OutletTemperature),
            DUMMY => Ok(StrategyType::Dummy),
            _ => Err(ConversionError::UnknownStrategyType(s.to_string())),
        }
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyType::OutletTemperature => write!(f, "{}", OUTLET_TEMPERATURE),
            StrategyType::Dummy => write!(f, "{}", DUMMY),
        }
    }
}
