use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::action::action_descriptor::{ActionDescriptor, ActionParameters};
use crate::domain::cluster::snapshot::ClusterSnapshot;
use crate::domain::utils::id::ResourceId;
use crate::error::SolutionError;

/// Ordered action plan produced by one strategy run.
///
/// Actions can only be appended. Attaching the final cluster snapshot freezes the solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    id: Uuid,
    strategy: String,
    actions: Vec<ActionDescriptor>,
    model: Option<ClusterSnapshot>,
}

impl Solution {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), strategy: strategy.into(), actions: Vec::new(), model: None }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn add_action(&mut self, action_type: impl Into<String>, applies_to: ResourceId, input_parameters: ActionParameters) -> Result<&ActionDescriptor, SolutionError> {
        if self.is_frozen() {
            return Err(SolutionError::Frozen(self.id));
        }
        self.actions.push(ActionDescriptor::new(action_type, applies_to, input_parameters));
        Ok(&self.actions[self.actions.len() - 1])
    }

    pub fn actions(&self) -> &[ActionDescriptor] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Attaches the cluster state the plan was decided on and freezes the solution.
    pub fn attach_model(&mut self, snapshot: ClusterSnapshot) -> Result<(), SolutionError> {
        if self.is_frozen() {
            return Err(SolutionError::Frozen(self.id));
        }
        self.model = Some(snapshot);
        Ok(())
    }

    pub fn model(&self) -> Option<&ClusterSnapshot> {
        self.model.as_ref()
    }

    pub fn is_frozen(&self) -> bool {
        self.model.is_some()
    }
}
