pub mod cluster_model;
pub mod host;
pub mod pending_moves;
pub mod resources;
pub mod snapshot;
pub mod workload;
