use crate::errors::ToolError;
use serde_json::{Map, Value};

/// Name-keyed argument bag of one tool invocation.
///
/// Optional accessors fall back to a default when the argument is absent or
/// of an unusable type; `require_*` accessors fail with a
/// `MissingArgument` error when the argument is absent, null or empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArgs {
    values: Map<String, Value>,
}

impl ToolArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> Result<Self, ToolError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(values) => Ok(Self { values }),
            _ => Err(ToolError::invalid_argument("arguments", "object")),
        }
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    /// Present, textual and non-blank. The value is returned as sent;
    /// whitespace only decides blankness.
    pub fn optional_string(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::String(text) => (!text.trim().is_empty()).then(|| text.clone()),
            Value::Number(num) => Some(num.to_string()),
            _ => None,
        }
    }

    pub fn require_string(&self, name: &str) -> Result<String, ToolError> {
        match self.get(name) {
            None => Err(ToolError::missing_argument(name)),
            Some(Value::String(_)) | Some(Value::Number(_)) => self
                .optional_string(name)
                .ok_or_else(|| ToolError::missing_argument(name)),
            Some(_) => Err(ToolError::invalid_argument(name, "string")),
        }
    }

    pub fn get_bool(&self, name: &str, default: bool) -> bool {
        match self.get(name) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::String(text)) => parse_bool(text).unwrap_or(default),
            Some(Value::Number(num)) => num.as_f64().map(|v| v != 0.0).unwrap_or(default),
            _ => default,
        }
    }

    pub fn flag(&self, name: &str) -> bool {
        self.get_bool(name, false)
    }

    pub fn get_f64(&self, name: &str, default: f64) -> f64 {
        self.number(name).unwrap_or(default)
    }

    pub fn require_f64(&self, name: &str) -> Result<f64, ToolError> {
        match self.get(name) {
            None => Err(ToolError::missing_argument(name)),
            Some(Value::String(text)) if text.trim().is_empty() => {
                Err(ToolError::missing_argument(name))
            }
            Some(_) => self
                .number(name)
                .ok_or_else(|| ToolError::invalid_argument(name, "number")),
        }
    }

    fn number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(num) => num.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "on" => Some(true),
        "0" | "f" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
