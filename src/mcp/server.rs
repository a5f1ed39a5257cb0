use crate::app::App;
use crate::constants::server::{NAME, PROTOCOL_VERSION, VERSION};
use crate::errors::{ErrorCode, McpError, ToolError};
use crate::mcp::catalog::list_tools;
use crate::mcp::protocol::{
    CallToolParams, CancelledParams, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION,
};
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolExecutor;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

const RESPONSE_QUEUE: usize = 64;

/// Cancellation tokens of running `tools/call` requests, keyed by the
/// JSON-encoded request id. Each registration carries a serial so a call
/// only ever removes its own entry when a client reuses an id.
#[derive(Clone, Default)]
struct InFlight {
    calls: Arc<Mutex<HashMap<String, (u64, CancellationToken)>>>,
    next_serial: Arc<AtomicU64>,
}

impl InFlight {
    fn register(&self, id: &Value) -> (u64, CancellationToken) {
        let serial = self.next_serial.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        if let Ok(mut calls) = self.calls.lock() {
            calls.insert(id.to_string(), (serial, token.clone()));
        }
        (serial, token)
    }

    fn finish(&self, id: &Value, serial: u64) {
        if let Ok(mut calls) = self.calls.lock() {
            let key = id.to_string();
            if calls.get(&key).map(|(current, _)| *current) == Some(serial) {
                calls.remove(&key);
            }
        }
    }

    fn cancel(&self, id: &Value) -> bool {
        let token = match self.calls.lock() {
            Ok(calls) => calls.get(&id.to_string()).map(|(_, token)| token.clone()),
            Err(_) => None,
        };
        match token {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

pub struct McpServer {
    logger: Logger,
    executor: Arc<ToolExecutor>,
    in_flight: InFlight,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        Self {
            logger: app.logger.child("mcp"),
            executor: app.tool_executor,
            in_flight: InFlight::default(),
        }
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": { "listChanged": false } },
            "serverInfo": { "name": NAME, "version": VERSION },
        })
    }

    fn handle_cancelled(&self, params: Value) {
        let Ok(params) = serde_json::from_value::<CancelledParams>(params) else {
            self.logger.warn("malformed cancellation notice", None);
            return;
        };
        let found = self.in_flight.cancel(&params.request_id);
        self.logger.info(
            "cancel requested",
            Some(&serde_json::json!({
                "request_id": params.request_id,
                "reason": params.reason,
                "in_flight": found,
            })),
        );
    }

    /// Starts a `tools/call` on its own task. The response is queued on
    /// `tx` unless the call was cancelled first.
    fn spawn_call(
        &self,
        id: Value,
        params: Value,
        tx: &mpsc::Sender<JsonRpcResponse>,
        tasks: &mut JoinSet<()>,
    ) {
        let params: CallToolParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(err) => {
                let response = JsonRpcResponse::failure(
                    id,
                    McpError::new(
                        ErrorCode::InvalidParams,
                        format!("Invalid params: {}", err),
                    ),
                );
                let tx = tx.clone();
                tasks.spawn(async move {
                    let _ = tx.send(response).await;
                });
                return;
            }
        };

        let (serial, cancel) = self.in_flight.register(&id);
        let executor = self.executor.clone();
        let in_flight = self.in_flight.clone();
        let logger = self.logger.clone();
        let tx = tx.clone();
        tasks.spawn(async move {
            let response = if params.name.trim().is_empty() {
                JsonRpcResponse::failure(
                    id.clone(),
                    McpError::new(ErrorCode::InvalidParams, "Missing tool name"),
                )
            } else {
                match executor
                    .execute(&params.name, params.arguments, &cancel)
                    .await
                {
                    Ok(outcome) => {
                        JsonRpcResponse::success(id.clone(), outcome.into_call_result())
                    }
                    Err(err) => JsonRpcResponse::failure(id.clone(), unknown_tool_error(err)),
                }
            };
            in_flight.finish(&id, serial);
            if cancel.is_cancelled() {
                logger.debug(
                    "dropping response of cancelled call",
                    Some(&serde_json::json!({ "id": id })),
                );
                return;
            }
            let _ = tx.send(response).await;
        });
    }

    fn dispatch(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            if request.method == "notifications/cancelled" {
                self.handle_cancelled(request.params);
            }
            return None;
        }
        let id = request.id.unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, self.handle_initialize()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => match list_tools() {
                Ok(tools) => JsonRpcResponse::success(id, tools),
                Err(err) => JsonRpcResponse::failure(id, err),
            },
            other => JsonRpcResponse::failure(
                id,
                McpError::new(
                    ErrorCode::MethodNotFound,
                    format!("Method not found: {}", other),
                ),
            ),
        };
        Some(response)
    }

    /// Serves newline-delimited JSON-RPC from `reader` until EOF. Calls still
    /// running at EOF are awaited so their responses are not lost.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), ToolError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<JsonRpcResponse>(RESPONSE_QUEUE);
        let writer_task = tokio::spawn(write_responses(writer, rx));
        let mut tasks = JoinSet::new();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            while tasks.try_join_next().is_some() {}

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let parsed: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(err) => {
                    self.logger.warn(
                        "unparseable message",
                        Some(&serde_json::json!({ "error": err.to_string() })),
                    );
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        McpError::new(ErrorCode::ParseError, "Parse error"),
                    );
                    let _ = tx.send(response).await;
                    continue;
                }
            };
            let request = match serde_json::from_value::<JsonRpcRequest>(parsed) {
                Ok(request) if request.jsonrpc == JSONRPC_VERSION => request,
                _ => {
                    let response = JsonRpcResponse::failure(
                        Value::Null,
                        McpError::new(ErrorCode::InvalidRequest, "Invalid request"),
                    );
                    let _ = tx.send(response).await;
                    continue;
                }
            };

            if request.method == "tools/call" {
                if let Some(id) = request.id {
                    self.spawn_call(id, request.params, &tx, &mut tasks);
                }
                continue;
            }
            if let Some(response) = self.dispatch(request) {
                let _ = tx.send(response).await;
            }
        }

        self.logger.debug(
            "stdin closed",
            Some(&serde_json::json!({ "pending_calls": tasks.len() })),
        );
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                self.logger.error(
                    "tool call task failed",
                    Some(&serde_json::json!({ "error": err.to_string() })),
                );
            }
        }
        drop(tx);

        match writer_task.await {
            Ok(result) => result.map_err(ToolError::from),
            Err(err) => Err(ToolError::internal(format!("response writer failed: {}", err))),
        }
    }
}

fn unknown_tool_error(err: ToolError) -> McpError {
    let message = match &err.hint {
        Some(hint) => format!("{}. {}", err.message, hint),
        None => err.message.clone(),
    };
    McpError::new(ErrorCode::InvalidParams, message)
}

async fn write_responses<W>(
    writer: W,
    mut rx: mpsc::Receiver<JsonRpcResponse>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut writer = BufWriter::new(writer);
    while let Some(response) = rx.recv().await {
        let payload = serde_json::to_string(&response)?;
        writer.write_all(payload.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

pub async fn run_stdio(logger: Logger) -> Result<(), ToolError> {
    let app = App::initialize(logger.clone())?;
    let server = McpServer::new(app);
    let result = server
        .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await;
    logger.info("shutdown", Some(&logger.stats()));
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reused_id_keeps_the_newer_call_cancellable() {
        let in_flight = InFlight::default();
        let id = serde_json::json!(1);
        let (first, first_token) = in_flight.register(&id);
        let (_, second_token) = in_flight.register(&id);

        in_flight.finish(&id, first);
        assert!(in_flight.cancel(&id));
        assert!(second_token.is_cancelled());
        assert!(!first_token.is_cancelled());
    }

    #[test]
    fn finished_call_is_no_longer_cancellable() {
        let in_flight = InFlight::default();
        let id = serde_json::json!("a");
        let (serial, token) = in_flight.register(&id);
        in_flight.finish(&id, serial);
        assert!(!in_flight.cancel(&id));
        assert!(!token.is_cancelled());
    }
}
