use crate::domain::action::action_descriptor::ActionParameters;
use crate::domain::action::action_trait::{Action, ActionBase, required_str};
use crate::domain::action::compute_backend::ComputeBackend;
use crate::error::ActionError;

pub const NOP: &str = "nop";
pub const MESSAGE: &str = "message";

/// Logs its message and changes nothing.
#[derive(Debug, Default)]
pub struct NopAction {
    base: ActionBase,
}

impl NopAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn construct() -> Box<dyn Action> {
        Box::new(Self::new())
    }
}

impl Action for NopAction {
    fn get_base(&self) -> &ActionBase {
        &self.base
    }

    fn get_base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn action_type(&self) -> &'static str {
        NOP
    }

    fn validate_parameters(&self, input_parameters: &ActionParameters) -> Result<(), ActionError> {
        required_str(NOP, input_parameters, MESSAGE).map(|_| ())
    }

    fn execute(&mut self, _backend: &mut dyn ComputeBackend) -> Result<(), ActionError> {
        self.pre_condition()?;
        log::info!("{}", required_str(NOP, self.input_parameters(), MESSAGE)?);
        Ok(())
    }

    fn revert(&mut self, _backend: &mut dyn ComputeBackend) -> Result<(), ActionError> {
        log::debug!("Revert of nop action is a no-op");
        Ok(())
    }
}
