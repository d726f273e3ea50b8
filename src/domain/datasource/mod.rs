pub mod datasource_mock;
pub mod datasource_trait;
pub mod datasource_type;
