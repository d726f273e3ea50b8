pub mod cluster_dto;
pub mod telemetry_dto;
