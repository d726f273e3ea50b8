use crate::domain::action::action_descriptor::ActionParameters;
use crate::domain::action::compute_backend::ComputeBackend;
use crate::domain::utils::id::ResourceId;
use crate::error::ActionError;

/// State every action carries once bound to a descriptor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionBase {
    pub input_parameters: ActionParameters,
    pub applies_to: Option<ResourceId>,
}

/// Executable counterpart of an `ActionDescriptor`, created by the `ActionRegistry`.
pub trait Action: std::fmt::Debug + Send {
    fn get_base(&self) -> &ActionBase;

    fn get_base_mut(&mut self) -> &mut ActionBase;

    /// Name this action is registered under.
    fn action_type(&self) -> &'static str;

    /// Rejects parameters this action cannot run with. Called by `bind` before anything is set.
    fn validate_parameters(&self, input_parameters: &ActionParameters) -> Result<(), ActionError>;

    fn execute(&mut self, backend: &mut dyn ComputeBackend) -> Result<(), ActionError>;

    fn revert(&mut self, backend: &mut dyn ComputeBackend) -> Result<(), ActionError>;

    fn input_parameters(&self) -> &ActionParameters {
        &self.get_base().input_parameters
    }

    fn applies_to(&self) -> Option<&ResourceId> {
        self.get_base().applies_to.as_ref()
    }

    fn is_bound(&self) -> bool {
        self.get_base().applies_to.is_some()
    }

    /// Sets parameters and scope together, or neither of them.
    fn bind(&mut self, input_parameters: ActionParameters, applies_to: ResourceId) -> Result<(), ActionError> {
        self.validate_parameters(&input_parameters)?;

        let base = self.get_base_mut();
        base.input_parameters = input_parameters;
        base.applies_to = Some(applies_to);
        Ok(())
    }

    fn pre_condition(&self) -> Result<(), ActionError> {
        if !self.is_bound() {
            return Err(ActionError::NotBound(self.action_type().to_string()));
        }
        self.validate_parameters(self.input_parameters())
    }
}

/// Reads a required, non-empty string parameter.
pub fn required_str<'a>(action_type: &str, input_parameters: &'a ActionParameters, parameter: &str) -> Result<&'a str, ActionError> {
    let value = input_parameters
        .get(parameter)
        .ok_or_else(|| ActionError::MissingParameter { action_type: action_type.to_string(), parameter: parameter.to_string() })?;

    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s),
        Some(_) => Err(ActionError::InvalidParameter {
            action_type: action_type.to_string(),
            parameter: parameter.to_string(),
            reason: "must not be empty".to_string(),
        }),
        None => Err(ActionError::InvalidParameter {
            action_type: action_type.to_string(),
            parameter: parameter.to_string(),
            reason: format!("expected a string, got {}", value),
        }),
    }
}
