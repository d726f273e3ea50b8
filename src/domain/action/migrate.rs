use std::fmt;
use std::str::FromStr;

use crate::domain::action::action_descriptor::ActionParameters;
use crate::domain::action::action_trait::{Action, ActionBase, required_str};
use crate::domain::action::compute_backend::ComputeBackend;
use crate::domain::utils::id::{HostId, ResourceId};
use crate::error::{ActionError, ConversionError};

pub const MIGRATE: &str = "migrate";

pub const MIGRATION_TYPE: &str = "migration_type";
pub const SOURCE_NODE: &str = "source_node";
pub const DESTINATION_NODE: &str = "destination_node";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationType {
    Live,
    Cold,
}

impl FromStr for MigrationType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "live" => Ok(MigrationType::Live),
            "cold" => Ok(MigrationType::Cold),
            _ => Err(ConversionError::UnknownMigrationType(s.to_string())),
        }
    }
}

impl fmt::Display for MigrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationType::Live => write!(f, "live"),
            MigrationType::Cold => write!(f, "cold"),
        }
    }
}

/// Parameters of a migration, parsed from the untyped parameter map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    pub migration_type: MigrationType,
    pub source: HostId,
    pub destination: HostId,
}

impl MigrationPlan {
    pub fn parse(input_parameters: &ActionParameters) -> Result<Self, ActionError> {
        let migration_type = required_str(MIGRATE, input_parameters, MIGRATION_TYPE)?;
        let migration_type = MigrationType::from_str(migration_type).map_err(|e| ActionError::InvalidParameter {
            action_type: MIGRATE.to_string(),
            parameter: MIGRATION_TYPE.to_string(),
            reason: e.to_string(),
        })?;
        let source = HostId::new(required_str(MIGRATE, input_parameters, SOURCE_NODE)?);
        let destination = HostId::new(required_str(MIGRATE, input_parameters, DESTINATION_NODE)?);

        if source == destination {
            return Err(ActionError::InvalidParameter {
                action_type: MIGRATE.to_string(),
                parameter: DESTINATION_NODE.to_string(),
                reason: format!("source and destination are both {}", source),
            });
        }
        Ok(Self { migration_type, source, destination })
    }

    pub fn to_parameters(&self) -> ActionParameters {
        let mut parameters = ActionParameters::new();
        parameters.insert(MIGRATION_TYPE.to_string(), self.migration_type.to_string().into());
        parameters.insert(SOURCE_NODE.to_string(), self.source.id.clone().into());
        parameters.insert(DESTINATION_NODE.to_string(), self.destination.id.clone().into());
        parameters
    }
}

/// Moves a workload between two hosts.
#[derive(Debug, Default)]
pub struct MigrateAction {
    base: ActionBase,
}

impl MigrateAction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn construct() -> Box<dyn Action> {
        Box::new(Self::new())
    }

    fn bound_plan(&self) -> Result<(ResourceId, MigrationPlan), ActionError> {
        self.pre_condition()?;
        let workload = self.applies_to().cloned().ok_or_else(|| ActionError::NotBound(MIGRATE.to_string()))?;
        Ok((workload, MigrationPlan::parse(self.input_parameters())?))
    }

    fn migrate(backend: &mut dyn ComputeBackend, workload: &ResourceId, migration_type: MigrationType, source: &HostId, destination: &HostId) -> Result<(), ActionError> {
        log::info!("Migrating {} from {} to {} ({})", workload, source, destination, migration_type);
        match migration_type {
            MigrationType::Live => backend.live_migrate(workload, source, destination),
            MigrationType::Cold => backend.cold_migrate(workload, source, destination),
        }
    }
}

impl Action for MigrateAction {
    fn get_base(&self) -> &ActionBase {
        &self.base
    }

    fn get_base_mut(&mut self) -> &mut ActionBase {
        &mut self.base
    }

    fn action_type(&self) -> &'static str {
        MIGRATE
    }

    fn validate_parameters(&self, input_parameters: &ActionParameters) -> Result<(), ActionError> {
        MigrationPlan::parse(input_parameters).map(|_| ())
    }

    fn execute(&mut self, backend: &mut dyn ComputeBackend) -> Result<(), ActionError> {
        let (workload, plan) = self.bound_plan()?;
        Self::migrate(backend, &workload, plan.migration_type, &plan.source, &plan.destination)
    }

    fn revert(&mut self, backend: &mut dyn ComputeBackend) -> Result<(), ActionError> {
        let (workload, plan) = self.bound_plan()?;
        Self::migrate(backend, &workload, plan.migration_type, &plan.destination, &plan.source)
    }
}
