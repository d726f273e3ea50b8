use std::collections::HashMap;

use crate::domain::action::action_descriptor::ActionDescriptor;
use crate::domain::action::action_trait::Action;
use crate::domain::action::migrate::{MIGRATE, MigrateAction};
use crate::domain::action::nop::{NOP, NopAction};
use crate::error::ActionError;

/// Builds a fresh, unbound action.
pub type ActionConstructor = fn() -> Box<dyn Action>;

/// Maps action type names to constructors. Filled by explicit `register` calls at start-up.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    directory: HashMap<String, ActionConstructor>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every action type this crate ships.
    pub fn with_default_actions() -> Self {
        let mut registry = Self::new();
        let defaults: [(&str, ActionConstructor); 2] = [(MIGRATE, MigrateAction::construct), (NOP, NopAction::construct)];
        for (type_name, constructor) in defaults {
            if let Err(e) = registry.register(type_name, constructor) {
                log::warn!("Skipping built-in action: {}", e);
            }
        }
        registry
    }

    pub fn register(&mut self, type_name: impl Into<String>, constructor: ActionConstructor) -> Result<(), ActionError> {
        let type_name = type_name.into();
        if self.directory.contains_key(&type_name) {
            return Err(ActionError::DuplicateActionType(type_name));
        }
        log::debug!("Registered action type '{}'", type_name);
        self.directory.insert(type_name, constructor);
        Ok(())
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.directory.contains_key(type_name)
    }

    /// Registered names, sorted.
    pub fn registered_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directory.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fresh instance of the named action type, not yet bound to any descriptor.
    pub fn load(&self, type_name: &str) -> Result<Box<dyn Action>, ActionError> {
        let constructor = self.directory.get(type_name).ok_or_else(|| ActionError::NoSuchActionType(type_name.to_string()))?;
        Ok(constructor())
    }

    /// Fresh instance bound to a copy of the descriptor's parameters and scope. On a binding
    /// failure the instance is dropped and only the error is returned.
    pub fn materialize(&self, descriptor: &ActionDescriptor) -> Result<Box<dyn Action>, ActionError> {
        log::debug!("Creating instance of {}", descriptor.action_type());
        let mut action = self.load(descriptor.action_type())?;
        action.bind(descriptor.input_parameters().clone(), descriptor.applies_to().clone())?;
        Ok(action)
    }
}
