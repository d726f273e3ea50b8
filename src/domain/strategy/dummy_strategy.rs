use serde_json::{Map, Value};

use crate::domain::action::action_descriptor::ActionParameters;
use crate::domain::action::nop::{MESSAGE, NOP};
use crate::domain::strategy::config::{ConfigSchema, OptionSpec, OptionType, StrategyInput};
use crate::domain::strategy::strategy_trait::{Strategy, StrategyBase, StrategyDependencies};
use crate::domain::utils::id::ResourceId;
use crate::error::{ConfigError, StrategyError};

pub const DUMMY: &str = "dummy";

const DEFAULT_MESSAGE: &str = "Dummy strategy executed";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DummyConfig {
    pub message: String,
}

impl DummyConfig {
    pub fn schema() -> ConfigSchema {
        ConfigSchema::new(vec![OptionSpec::new(MESSAGE, OptionType::String, "Message logged by the nop action").with_default(DEFAULT_MESSAGE)])
    }
}

impl TryFrom<&StrategyInput> for DummyConfig {
    type Error = ConfigError;

    fn try_from(input: &StrategyInput) -> Result<Self, Self::Error> {
        Ok(Self { message: input.get_str(MESSAGE)?.to_string() })
    }
}

/// Emits a single `nop` action on the first eligible host. Plans nothing.
#[derive(Debug)]
pub struct DummyStrategy {
    base: StrategyBase,
    config: DummyConfig,
}

impl DummyStrategy {
    pub fn new(config: DummyConfig, dependencies: StrategyDependencies) -> Self {
        Self { base: StrategyBase::new(DUMMY, &dependencies.span), config }
    }

    pub fn from_parameters(parameters: &Map<String, Value>, dependencies: StrategyDependencies) -> Result<Self, StrategyError> {
        let input = DummyConfig::schema().validate(parameters)?;
        Ok(Self::new(DummyConfig::try_from(&input)?, dependencies))
    }
}

impl Strategy for DummyStrategy {
    fn get_base(&self) -> &StrategyBase {
        &self.base
    }

    fn get_base_mut(&mut self) -> &mut StrategyBase {
        &mut self.base
    }

    fn get_display_name(&self) -> &'static str {
        "Dummy strategy"
    }

    fn get_schema(&self) -> ConfigSchema {
        DummyConfig::schema()
    }

    fn do_execute(&mut self) -> Result<(), StrategyError> {
        let Some(host) = self.base.cluster_model()?.eligible_hosts().into_iter().next() else {
            tracing::warn!("No eligible hosts in the cluster");
            return Ok(());
        };

        let mut parameters = ActionParameters::new();
        parameters.insert(MESSAGE.to_string(), self.config.message.clone().into());
        self.base.solution.add_action(NOP, ResourceId::from(&host.id), parameters)?;
        Ok(())
    }
}
