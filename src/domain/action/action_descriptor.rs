use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::utils::id::ResourceId;

/// Named, JSON-typed parameters of an action.
pub type ActionParameters = BTreeMap<String, serde_json::Value>;

/// Symbolic description of one planned change. Produced by a strategy, transported as data, and
/// turned into a live `Action` by the `ActionRegistry` at execution time.
///
/// Fields are private: a descriptor does not change once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    id: Uuid,
    action_type: String,
    input_parameters: ActionParameters,
    applies_to: ResourceId,
}

impl ActionDescriptor {
    pub fn new(action_type: impl Into<String>, applies_to: ResourceId, input_parameters: ActionParameters) -> Self {
        Self { id: Uuid::new_v4(), action_type: action_type.into(), input_parameters, applies_to }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn input_parameters(&self) -> &ActionParameters {
        &self.input_parameters
    }

    pub fn applies_to(&self) -> &ResourceId {
        &self.applies_to
    }
}
