use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    Configuration,
    MissingArgument,
    InvalidArgument,
    Transport,
    Upstream,
    Internal,
}

#[derive(Debug, Clone, Serialize, Error)]
#[error("{message}")]
pub struct ToolError {
    pub kind: ToolErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            hint: None,
            details: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Configuration, "CONFIGURATION_ERROR", message)
    }

    /// Required argument absent or empty. The message mirrors the wording
    /// agents already see from other MCP servers.
    pub fn missing_argument(name: &str) -> Self {
        Self::new(
            ToolErrorKind::MissingArgument,
            "MISSING_ARGUMENT",
            format!("required argument \"{}\" not found", name),
        )
        .with_details(serde_json::json!({ "argument": name }))
    }

    pub fn invalid_argument(name: &str, expected: &str) -> Self {
        Self::new(
            ToolErrorKind::InvalidArgument,
            "INVALID_ARGUMENT",
            format!("argument \"{}\" is not a {}", name, expected),
        )
        .with_details(serde_json::json!({ "argument": name, "expected": expected }))
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Transport, "TRANSPORT_ERROR", message)
    }

    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Upstream, "UPSTREAM_ERROR", message)
            .with_details(serde_json::json!({ "status": status }))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Internal, "INTERNAL", message)
    }

    pub fn upstream_status(&self) -> Option<u16> {
        if self.kind != ToolErrorKind::Upstream {
            return None;
        }
        self.details
            .as_ref()
            .and_then(|d| d.get("status"))
            .and_then(|v| v.as_u64())
            .map(|v| v as u16)
    }
}

impl From<std::io::Error> for ToolError {
    fn from(err: std::io::Error) -> Self {
        ToolError::internal(err.to_string())
    }
}
