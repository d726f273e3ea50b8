pub mod config;
pub mod dummy_strategy;
pub mod outlet_temp_control;
pub mod strategy_trait;
pub mod strategy_type;
pub mod workload_selection;
