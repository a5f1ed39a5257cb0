use async_trait::async_trait;
use base64::Engine;
use bytes::Bytes;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::constants::limits::SUGGESTION_LIMIT;
use crate::errors::{ToolError, ToolErrorKind};
use crate::services::args::ToolArgs;
use crate::services::logger::Logger;
use crate::utils::suggest::suggest;

#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(
        &self,
        args: &ToolArgs,
        cancel: &CancellationToken,
    ) -> Result<Bytes, ToolError>;
}

/// Outcome of one tool call as reported to the client. Failures are data,
/// not protocol errors.
#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Success(Bytes),
    Failure(ToolError),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    pub fn error(&self) -> Option<&ToolError> {
        match self {
            ToolOutcome::Failure(err) => Some(err),
            ToolOutcome::Success(_) => None,
        }
    }

    /// UTF-8 bodies verbatim, anything else (cover art, author images) as
    /// standard base64.
    pub fn text(&self) -> String {
        match self {
            ToolOutcome::Success(body) => match std::str::from_utf8(body) {
                Ok(text) => text.to_string(),
                Err(_) => base64::engine::general_purpose::STANDARD.encode(body),
            },
            ToolOutcome::Failure(err) => err.message.clone(),
        }
    }

    pub fn into_call_result(self) -> Value {
        let mut result = serde_json::json!({
            "content": [ { "type": "text", "text": self.text() } ],
            "isError": self.is_error(),
        });
        if let (Some(err), Some(obj)) = (self.error(), result.as_object_mut()) {
            let mut error = serde_json::json!({
                "kind": err.kind,
                "code": err.code,
            });
            if let Some(status) = err.upstream_status() {
                error["status"] = Value::from(status);
            }
            if let Some(hint) = &err.hint {
                error["hint"] = Value::String(hint.clone());
            }
            obj.insert("_meta".to_string(), serde_json::json!({ "error": error }));
        }
        result
    }
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Runs one tool call. Only an unknown tool name is an `Err`; every
    /// failure inside the tool comes back as [`ToolOutcome::Failure`].
    pub async fn execute(
        &self,
        tool: &str,
        args: Value,
        cancel: &CancellationToken,
    ) -> Result<ToolOutcome, ToolError> {
        let Some(handler) = self.handlers.get(tool) else {
            return Err(self.unknown_tool(tool));
        };

        let trace_id = uuid::Uuid::new_v4().to_string();
        let started_at = chrono::Utc::now().timestamp_millis();

        let outcome = match ToolArgs::from_value(args) {
            Ok(args) => {
                self.logger.debug(
                    "call",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "trace_id": trace_id,
                        "args": args.keys().collect::<Vec<_>>(),
                    })),
                );
                match handler.handle(&args, cancel).await {
                    Ok(body) => ToolOutcome::Success(body),
                    Err(err) => ToolOutcome::Failure(err),
                }
            }
            Err(err) => ToolOutcome::Failure(err),
        };

        let duration_ms = chrono::Utc::now().timestamp_millis() - started_at;
        match &outcome {
            ToolOutcome::Success(body) => self.logger.info(
                "ok",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "bytes": body.len(),
                    "duration_ms": duration_ms,
                })),
            ),
            ToolOutcome::Failure(err) => self.logger.warn(
                "failed",
                Some(&serde_json::json!({
                    "tool": tool,
                    "trace_id": trace_id,
                    "kind": err.kind,
                    "code": err.code,
                    "duration_ms": duration_ms,
                })),
            ),
        }
        Ok(outcome)
    }

    fn unknown_tool(&self, tool: &str) -> ToolError {
        let suggestions = suggest(tool, &self.tool_names(), SUGGESTION_LIMIT);
        let hint = if suggestions.is_empty() {
            "Call tools/list to see available tools".to_string()
        } else {
            format!("Did you mean: {}?", suggestions.join(", "))
        };
        ToolError::new(
            ToolErrorKind::InvalidArgument,
            "UNKNOWN_TOOL",
            format!("Unknown tool: {}", tool),
        )
        .with_hint(hint)
        .with_details(serde_json::json!({ "tool": tool, "did_you_mean": suggestions }))
    }
}
