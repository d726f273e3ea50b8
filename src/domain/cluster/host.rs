use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::cluster::resources::ResourceVector;
use crate::domain::utils::id::HostId;
use crate::error::ConversionError;

/// Administrative status set by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostStatus {
    Enabled,
    Disabled,
}

/// Availability as reported by the host's service heartbeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostAvailability {
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub id: HostId,
    pub hostname: String,
    pub capacity: ResourceVector,
    pub status: HostStatus,
    pub availability: HostAvailability,
}

impl Host {
    pub fn new(id: HostId, capacity: ResourceVector) -> Self {
        let hostname = id.id.clone();
        Self { id, hostname, capacity, status: HostStatus::Enabled, availability: HostAvailability::Online }
    }

    pub fn with_status(mut self, status: HostStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_availability(mut self, availability: HostAvailability) -> Self {
        self.availability = availability;
        self
    }

    /// A host may receive or give away workloads only while it is online and enabled.
    pub fn is_eligible(&self) -> bool {
        self.availability == HostAvailability::Online && self.status == HostStatus::Enabled
    }
}

impl FromStr for HostStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "enabled" => Ok(HostStatus::Enabled),
            "disabled" => Ok(HostStatus::Disabled),
            _ => Err(ConversionError::UnknownHostStatus(s.to_string())),
        }
    }
}

impl FromStr for HostAvailability {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "online" => Ok(HostAvailability::Online),
            "down" | "offline" => Ok(HostAvailability::Offline),
            _ => Err(ConversionError::UnknownHostAvailability(s.to_string())),
        }
    }
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostStatus::Enabled => write!(f, "enabled"),
            HostStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl fmt::Display for HostAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAvailability::Online => write!(f, "online"),
            HostAvailability::Offline => write!(f, "offline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_requires_online_and_enabled() {
        let host = Host::new(HostId::new("h1"), ResourceVector::new(8, 8192, 100));
        assert!(host.is_eligible());

        assert!(!host.clone().with_status(HostStatus::Disabled).is_eligible());
        assert!(!host.clone().with_availability(HostAvailability::Offline).is_eligible());
        assert!(!host.with_status(HostStatus::Disabled).with_availability(HostAvailability::Offline).is_eligible());
    }

    #[test]
    fn parse_service_states() {
        assert_eq!(HostAvailability::from_str("up"), Ok(HostAvailability::Online));
        assert_eq!(HostStatus::from_str("DISABLED"), Ok(HostStatus::Disabled));
        assert!(HostStatus::from_str("maintenance").is_err());
    }
}
