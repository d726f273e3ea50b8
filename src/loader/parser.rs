use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

use crate::api::cluster_dto::ClusterDto;
use crate::api::telemetry_dto::TelemetryDto;
use crate::domain::cluster::cluster_model::ClusterModel;
use crate::domain::datasource::datasource_mock::StaticDatasource;
use crate::error::Result;

/// Parses a JSON file into a given type `T`.
///
/// Errors are converted into `crate::error::Error` variants:
/// - `Error::IoError` if the file cannot be read.
/// - `Error::DeserializationError` if the JSON is malformed.
pub fn parse_json_file<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> Result<T> {
    let data = fs::read_to_string(file_path)?;
    let parsed_data: T = serde_json::from_str(&data)?;
    Ok(parsed_data)
}

pub fn load_cluster_model(file_path: impl AsRef<Path>) -> Result<ClusterModel> {
    let dto: ClusterDto = parse_json_file(file_path)?;
    ClusterModel::try_from(dto)
}

pub fn load_telemetry(file_path: impl AsRef<Path>) -> Result<StaticDatasource> {
    let dto: TelemetryDto = parse_json_file(file_path)?;
    Ok(StaticDatasource::from(dto))
}

/// Raw strategy parameters, a JSON object mapping option names to values.
pub fn load_parameters(file_path: impl AsRef<Path>) -> Result<Map<String, Value>> {
    parse_json_file(file_path)
}
