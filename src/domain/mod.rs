pub mod action;
pub mod clock;
pub mod cluster;
pub mod datasource;
pub mod solution;
pub mod strategy;
pub mod utils;
