pub mod action_descriptor;
pub mod action_registry;
pub mod action_trait;
pub mod compute_backend;
pub mod migrate;
pub mod nop;
