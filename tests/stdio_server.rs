mod common;
use common::{app_with, default_env, RecordingTransport, Reply};

use abs_mcp::mcp::server::McpServer;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Feeds `lines` to a server, closes its stdin and returns every response
/// written before it exited.
async fn exchange(transport: Arc<RecordingTransport>, lines: &[String]) -> Vec<Value> {
    let server = McpServer::new(app_with(default_env(), transport));
    let (mut client_out, server_in) = tokio::io::duplex(64 * 1024);
    let (server_out, client_in) = tokio::io::duplex(64 * 1024);

    let running =
        tokio::spawn(async move { server.serve(BufReader::new(server_in), server_out).await });

    for line in lines {
        client_out.write_all(line.as_bytes()).await.unwrap();
        client_out.write_all(b"\n").await.unwrap();
    }
    drop(client_out);

    let mut responses = Vec::new();
    let mut reader = BufReader::new(client_in).lines();
    while let Some(line) = reader.next_line().await.unwrap() {
        responses.push(serde_json::from_str(&line).unwrap());
    }
    running.await.unwrap().unwrap();
    responses
}

fn by_id(responses: &[Value], id: Value) -> &Value {
    responses
        .iter()
        .find(|r| r["id"] == id)
        .unwrap_or_else(|| panic!("no response with id {}", id))
}

fn msg(value: Value) -> String {
    value.to_string()
}

#[tokio::test]
async fn handshake_and_listing() {
    let responses = exchange(
        RecordingTransport::replying(b"{}"),
        &[
            msg(json!({"jsonrpc":"2.0","id":1,"method":"initialize","params":{}})),
            msg(json!({"jsonrpc":"2.0","method":"notifications/initialized"})),
            msg(json!({"jsonrpc":"2.0","id":2,"method":"tools/list"})),
            msg(json!({"jsonrpc":"2.0","id":3,"method":"ping"})),
            msg(json!({"jsonrpc":"2.0","id":4,"method":"resources/list"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 4);
    let init = by_id(&responses, json!(1));
    assert_eq!(init["result"]["serverInfo"]["name"], "abs-mcp");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    let tools = by_id(&responses, json!(2))["result"]["tools"]
        .as_array()
        .unwrap()
        .clone();
    assert_eq!(tools.len(), 34);
    assert!(tools.iter().any(|t| t["name"] == "create_library"));

    assert_eq!(by_id(&responses, json!(3))["result"], json!({}));
    assert_eq!(by_id(&responses, json!(4))["error"]["code"], -32601);
}

#[tokio::test]
async fn malformed_lines_get_protocol_errors() {
    let responses = exchange(
        RecordingTransport::replying(b"{}"),
        &[
            "{not json".to_string(),
            msg(json!({"jsonrpc":"1.0","id":1,"method":"ping"})),
            msg(json!({"id":2})),
            String::new(),
        ],
    )
    .await;

    let codes: Vec<i64> = responses
        .iter()
        .map(|r| r["error"]["code"].as_i64().unwrap())
        .collect();
    assert_eq!(codes, vec![-32700, -32600, -32600]);
}

#[tokio::test]
async fn tool_calls_return_text_results() {
    let transport = RecordingTransport::replying(br#"{"id":"lib123","name":"Books"}"#);
    let responses = exchange(
        transport.clone(),
        &[
            msg(json!({"jsonrpc":"2.0","id":"a","method":"tools/call",
                "params":{"name":"library","arguments":{"library_id":"lib123"}}})),
            msg(json!({"jsonrpc":"2.0","id":"b","method":"tools/call",
                "params":{"name":"library","arguments":{}}})),
        ],
    )
    .await;

    let ok = &by_id(&responses, json!("a"))["result"];
    assert_eq!(ok["isError"], false);
    assert_eq!(ok["content"][0]["type"], "text");
    assert_eq!(ok["content"][0]["text"], r#"{"id":"lib123","name":"Books"}"#);

    let failed = &by_id(&responses, json!("b"))["result"];
    assert_eq!(failed["isError"], true);
    assert_eq!(
        failed["content"][0]["text"],
        "required argument \"library_id\" not found"
    );
    assert_eq!(failed["_meta"]["error"]["kind"], "missing_argument");

    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn unknown_tool_is_invalid_params() {
    let responses = exchange(
        RecordingTransport::replying(b"{}"),
        &[
            msg(json!({"jsonrpc":"2.0","id":7,"method":"tools/call",
                "params":{"name":"librarys","arguments":{}}})),
            msg(json!({"jsonrpc":"2.0","id":8,"method":"tools/call","params":{}})),
        ],
    )
    .await;

    let unknown = &by_id(&responses, json!(7))["error"];
    assert_eq!(unknown["code"], -32602);
    let message = unknown["message"].as_str().unwrap();
    assert!(message.starts_with("Unknown tool: librarys"));
    assert!(message.contains("library"));

    assert_eq!(by_id(&responses, json!(8))["error"]["code"], -32602);
}

#[tokio::test]
async fn cancelled_call_is_aborted_without_response() {
    let transport = RecordingTransport::new(Reply::Hang);
    let responses = exchange(
        transport.clone(),
        &[
            msg(json!({"jsonrpc":"2.0","id":1,"method":"tools/call",
                "params":{"name":"libraries","arguments":{}}})),
            msg(json!({"jsonrpc":"2.0","method":"notifications/cancelled",
                "params":{"requestId":1,"reason":"user abort"}})),
            msg(json!({"jsonrpc":"2.0","id":2,"method":"ping"})),
        ],
    )
    .await;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0]["id"], 2);
    assert_eq!(transport.cancelled(), 1);
}
