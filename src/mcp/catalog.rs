use crate::errors::{ErrorCode, McpError};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Result<Vec<ToolDef>, String>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).map_err(|err| err.to_string())
});

/// Tool definitions in catalog order. Fails only if the embedded catalog is
/// malformed.
pub fn tool_catalog() -> Result<&'static [ToolDef], McpError> {
    TOOL_CATALOG.as_deref().map_err(|err| {
        McpError::new(
            ErrorCode::InternalError,
            format!("tool_catalog.json is invalid: {}", err),
        )
    })
}

/// The `tools/list` result body.
pub fn list_tools() -> Result<Value, McpError> {
    Ok(serde_json::json!({ "tools": tool_catalog()? }))
}
