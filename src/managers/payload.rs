use crate::errors::ToolError;
use crate::services::args::ToolArgs;
use serde_json::{Map, Value};

/// Assembles a JSON request body from tool arguments.
///
/// `require_*` methods fail fast with the argument's error; `optional_*`
/// methods only add a field when the argument carries a meaningful value.
#[derive(Debug, Clone, Default)]
pub struct JsonBody {
    fields: Map<String, Value>,
}

impl JsonBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(field.to_string(), value.into());
        self
    }

    pub fn require_string(
        self,
        args: &ToolArgs,
        arg: &str,
        field: &str,
    ) -> Result<Self, ToolError> {
        let value = args.require_string(arg)?;
        Ok(self.insert(field, value))
    }

    pub fn require_f64(self, args: &ToolArgs, arg: &str, field: &str) -> Result<Self, ToolError> {
        let value = args.require_f64(arg)?;
        Ok(self.insert(field, value))
    }

    pub fn optional_string(self, args: &ToolArgs, arg: &str, field: &str) -> Self {
        match args.optional_string(arg) {
            Some(value) => self.insert(field, value),
            None => self,
        }
    }

    /// Adds the number only when it is strictly positive.
    pub fn optional_positive_f64(self, args: &ToolArgs, arg: &str, field: &str) -> Self {
        let value = args.get_f64(arg, 0.0);
        if value > 0.0 {
            self.insert(field, value)
        } else {
            self
        }
    }

    /// Adds `field: true` only when the flag is set.
    pub fn flag_if_true(self, args: &ToolArgs, arg: &str, field: &str) -> Self {
        if args.flag(arg) {
            self.insert(field, true)
        } else {
            self
        }
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}
