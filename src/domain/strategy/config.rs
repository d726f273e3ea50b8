use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Number,
    Integer,
    String,
    Boolean,
}

impl OptionType {
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            OptionType::Number => value.is_number(),
            OptionType::Integer => value.is_i64() || value.is_u64(),
            OptionType::String => value.is_string(),
            OptionType::Boolean => value.is_boolean(),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Number => write!(f, "number"),
            OptionType::Integer => write!(f, "integer"),
            OptionType::String => write!(f, "string"),
            OptionType::Boolean => write!(f, "boolean"),
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declaration of one configuration option of a strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub typ: OptionType,
    pub default: Option<Value>,
    pub required: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<&'static str>,
}

impl OptionSpec {
    pub fn new(name: &'static str, typ: OptionType, description: &'static str) -> Self {
        Self { name, typ, default: None, required: false, description, choices: Vec::new() }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_choices(mut self, choices: &[&'static str]) -> Self {
        self.choices = choices.to_vec();
        self
    }

    fn check(&self, value: &Value) -> Result<(), ConfigError> {
        if !self.typ.accepts(value) {
            return Err(ConfigError::MistypedOption {
                name: self.name.to_string(),
                expected: self.typ.to_string(),
                found: json_type_name(value).to_string(),
            });
        }
        if !self.choices.is_empty() {
            let text = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
            if !self.choices.contains(&text.as_str()) {
                return Err(ConfigError::InvalidChoice {
                    name: self.name.to_string(),
                    value: text,
                    choices: self.choices.iter().map(|c| c.to_string()).collect(),
                });
            }
        }
        Ok(())
    }
}

/// The option table a strategy declares.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigSchema {
    options: Vec<OptionSpec>,
}

impl ConfigSchema {
    pub fn new(options: Vec<OptionSpec>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Checks raw options against the table and fills in defaults.
    ///
    /// Unknown names, wrong JSON types, values outside the declared choices and missing required
    /// options are rejected here, so typed configs never see them.
    pub fn validate(&self, raw: &Map<String, Value>) -> Result<StrategyInput, ConfigError> {
        if let Some(unknown) = raw.keys().find(|name| self.option(name).is_none()) {
            return Err(ConfigError::UnknownOption(unknown.clone()));
        }

        let mut values = BTreeMap::new();
        for option in &self.options {
            match raw.get(option.name) {
                Some(value) => {
                    option.check(value)?;
                    values.insert(option.name.to_string(), value.clone());
                }
                None => match &option.default {
                    Some(default) => {
                        values.insert(option.name.to_string(), default.clone());
                    }
                    None if option.required => return Err(ConfigError::MissingOption(option.name.to_string())),
                    None => {}
                },
            }
        }
        Ok(StrategyInput { values })
    }

    /// Input holding only the declared defaults.
    pub fn defaults(&self) -> Result<StrategyInput, ConfigError> {
        self.validate(&Map::new())
    }
}

/// Validated option values of one strategy instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StrategyInput {
    values: BTreeMap<String, Value>,
}

impl StrategyInput {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn require(&self, name: &str) -> Result<&Value, ConfigError> {
        self.values.get(name).ok_or_else(|| ConfigError::MissingOption(name.to_string()))
    }

    fn mistyped(name: &str, expected: OptionType, value: &Value) -> ConfigError {
        ConfigError::MistypedOption { name: name.to_string(), expected: expected.to_string(), found: json_type_name(value).to_string() }
    }

    pub fn get_f64(&self, name: &str) -> Result<f64, ConfigError> {
        let value = self.require(name)?;
        value.as_f64().ok_or_else(|| Self::mistyped(name, OptionType::Number, value))
    }

    pub fn get_str(&self, name: &str) -> Result<&str, ConfigError> {
        let value = self.require(name)?;
        value.as_str().ok_or_else(|| Self::mistyped(name, OptionType::String, value))
    }
}
