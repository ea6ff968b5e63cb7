//! Data models shared by the validator and the service

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stored logical expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Unique identifier, assigned once at creation
    pub id: String,

    /// Free-form label
    pub name: String,

    /// Normalized expression text
    #[serde(rename = "expression")]
    pub text: String,
}

impl Expression {
    pub fn new(id: String, name: String, text: String) -> Self {
        Self { id, name, text }
    }
}

/// Scalar value bound to a variable at evaluation time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl VariableValue {
    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            VariableValue::Integer(_) => "integer",
            VariableValue::Float(_) => "float",
            VariableValue::Boolean(_) => "boolean",
            VariableValue::String(_) => "string",
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Integer(i) => write!(f, "{i}"),
            VariableValue::Float(x) => write!(f, "{x}"),
            VariableValue::Boolean(b) => write!(f, "{b}"),
            VariableValue::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for VariableValue {
    fn from(value: i64) -> Self {
        VariableValue::Integer(value)
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Float(value)
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Boolean(value)
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::String(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::String(value)
    }
}

impl TryFrom<&serde_json::Value> for VariableValue {
    type Error = Error;

    fn try_from(value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Bool(b) => Ok(VariableValue::Boolean(*b)),
            serde_json::Value::String(s) => Ok(VariableValue::String(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(VariableValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(VariableValue::Float(f))
                } else {
                    Err(Error::invalid_argument(format!("Unsupported number: {n}")))
                }
            }
            other => Err(Error::invalid_argument(format!(
                "Unsupported value: {other}"
            ))),
        }
    }
}

/// Variable name to value mapping supplied at evaluation time
pub type Bindings = HashMap<String, VariableValue>;

/// Convert a JSON object of variables into bindings
///
/// Only scalar JSON values are accepted; `null`, arrays and objects are rejected.
pub fn bindings_from_json(variables: &serde_json::Map<String, serde_json::Value>) -> Result<Bindings> {
    variables
        .iter()
        .map(|(name, value)| {
            VariableValue::try_from(value)
                .map(|v| (name.clone(), v))
                .map_err(|_| {
                    Error::invalid_argument(format!("Unsupported value for variable '{name}'"))
                })
        })
        .collect()
}
