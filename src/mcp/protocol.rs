use crate::errors::McpError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl JsonRpcRequest {
    /// Notifications carry no id and never get a response.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// `params` of `tools/call`.
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// `params` of `notifications/cancelled`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelledParams {
    pub request_id: Value,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, err: McpError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code.as_i32(),
                message: err.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn cancellation_notification_has_no_id() {
        let raw = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": { "requestId": 7 },
        });
        let parsed: JsonRpcRequest = serde_json::from_value(raw).expect("must parse");
        assert!(parsed.is_notification());
        let params: CancelledParams = serde_json::from_value(parsed.params).expect("params");
        assert_eq!(params.request_id, serde_json::json!(7));
        assert!(params.reason.is_none());
    }

    #[test]
    fn call_params_default_missing_arguments_to_null() {
        let raw = r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"ping"}}"#;
        let parsed: JsonRpcRequest = serde_json::from_str(raw).expect("must parse");
        assert!(!parsed.is_notification());
        let params: CallToolParams = serde_json::from_value(parsed.params).expect("params");
        assert_eq!(params.name, "ping");
        assert!(params.arguments.is_null());
    }

    #[test]
    fn failure_serializes_code_without_result() {
        let response = JsonRpcResponse::failure(
            serde_json::json!(3),
            McpError::new(ErrorCode::MethodNotFound, "Method not found: foo"),
        );
        let encoded = serde_json::to_value(&response).expect("serialize");
        assert_eq!(encoded["error"]["code"], -32601);
        assert_eq!(encoded["id"], 3);
        assert!(encoded.get("result").is_none());
    }
}
