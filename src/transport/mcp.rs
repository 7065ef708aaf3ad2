//! MCP over stdio: newline-delimited JSON-RPC 2.0.
//!
//! Requests are handled concurrently. Responses go through a single writer
//! task so lines never interleave. stdout carries protocol traffic only;
//! logs belong on stderr.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::tools::ToolRegistry;
use crate::types::InvocationRequest;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    /// Absent means notification. An explicit `null` is still a request.
    #[serde(default, deserialize_with = "present")]
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct RpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Debug, Serialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl RpcResponse {
    fn result(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Serves a [`ToolRegistry`] to an MCP client.
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    name: String,
    version: String,
    in_flight: Mutex<HashMap<String, CancellationToken>>,
}

impl McpServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            name: env!("CARGO_PKG_NAME").into(),
            version: env!("CARGO_PKG_VERSION").into(),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Handle one line of input. Returns the serialized response, or `None`
    /// for notifications.
    pub async fn handle_message(&self, line: &str, shutdown: &CancellationToken) -> Option<String> {
        let response = match serde_json::from_str::<Value>(line) {
            Err(e) => Some(RpcResponse::error(Value::Null, PARSE_ERROR, format!("parse error: {e}"))),
            Ok(raw) => match serde_json::from_value::<RpcRequest>(raw) {
                Err(e) => Some(RpcResponse::error(
                    Value::Null,
                    INVALID_REQUEST,
                    format!("invalid request: {e}"),
                )),
                Ok(request) => self.dispatch(request, shutdown).await,
            },
        };

        response.and_then(|r| serde_json::to_string(&r).ok())
    }

    async fn dispatch(&self, request: RpcRequest, shutdown: &CancellationToken) -> Option<RpcResponse> {
        let Some(id) = request.id else {
            self.notification(&request.method, &request.params);
            return None;
        };

        debug!(method = %request.method, "mcp request");

        let response = match request.method.as_str() {
            "initialize" => {
                let version = request
                    .params
                    .get("protocolVersion")
                    .and_then(Value::as_str)
                    .unwrap_or(PROTOCOL_VERSION);
                RpcResponse::result(
                    id,
                    json!({
                        "protocolVersion": version,
                        "capabilities": { "tools": { "listChanged": false } },
                        "serverInfo": { "name": self.name, "version": self.version },
                    }),
                )
            }
            "ping" => RpcResponse::result(id, json!({})),
            "tools/list" => RpcResponse::result(id, json!({ "tools": self.registry.list() })),
            "tools/call" => match serde_json::from_value::<InvocationRequest>(request.params) {
                Ok(call) => {
                    let result = self.call_tool(&id, &call, shutdown).await;
                    RpcResponse::result(id, result)
                }
                Err(e) => RpcResponse::error(id, INVALID_PARAMS, format!("invalid params: {e}")),
            },
            other => RpcResponse::error(id, METHOD_NOT_FOUND, format!("method not found: {other}")),
        };

        Some(response)
    }

    async fn call_tool(&self, id: &Value, call: &InvocationRequest, shutdown: &CancellationToken) -> Value {
        let key = id.to_string();
        let cancel = shutdown.child_token();
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.insert(key.clone(), cancel.clone());
        }

        let envelope = self.registry.invoke_with_cancel(call, cancel).await;

        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.remove(&key);
        }

        let text = serde_json::to_string(&envelope).unwrap_or_else(|_| {
            r#"{"success":false,"error":{"message":"failed to encode result"}}"#.into()
        });
        json!({
            "content": [{ "type": "text", "text": text }],
            "isError": !envelope.is_success(),
        })
    }

    fn notification(&self, method: &str, params: &Value) {
        match method {
            "notifications/initialized" => info!("mcp client initialized"),
            "notifications/cancelled" => {
                let Some(request_id) = params.get("requestId") else {
                    return;
                };
                let token = self
                    .in_flight
                    .lock()
                    .ok()
                    .and_then(|in_flight| in_flight.get(&request_id.to_string()).cloned());
                if let Some(token) = token {
                    info!(request_id = %request_id, "client cancelled tool call");
                    token.cancel();
                }
            }
            other => debug!(method = other, "ignoring notification"),
        }
    }

    /// Read requests from `reader` until EOF or shutdown, writing responses
    /// to `writer`.
    pub async fn serve<R, W>(
        self: Arc<Self>,
        reader: R,
        mut writer: W,
        shutdown: CancellationToken,
    ) -> std::io::Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<String>(64);

        let writer_task = tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                writer.write_all(line.as_bytes()).await?;
                writer.write_all(b"\n").await?;
                writer.flush().await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let mut lines = BufReader::new(reader).lines();
        let mut handlers = tokio::task::JoinSet::new();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                Some(joined) = handlers.join_next(), if !handlers.is_empty() => {
                    reap(joined);
                    continue;
                }
                _ = shutdown.cancelled() => break,
            };
            let Some(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            let shutdown = shutdown.clone();
            handlers.spawn(async move {
                if let Some(response) = server.handle_message(&line, &shutdown).await {
                    if tx.send(response).await.is_err() {
                        warn!("response dropped, writer closed");
                    }
                }
            });
        }

        while let Some(joined) = handlers.join_next().await {
            reap(joined);
        }
        drop(tx);

        match writer_task.await {
            Ok(result) => result,
            Err(e) => Err(std::io::Error::other(e)),
        }
    }

    pub async fn serve_stdio(self: Arc<Self>, shutdown: CancellationToken) -> std::io::Result<()> {
        info!(tools = self.registry.len(), "serving MCP over stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout(), shutdown).await
    }
}

fn reap(joined: Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            error!(error = %e, "mcp request handler panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::error::ProviderError;
    use crate::provider::{PaystackProvider, ProviderRequest};
    use crate::schema::{FieldSpec, InputSchema};
    use crate::tools::{Endpoint, ToolDescriptor};
    use crate::types::ProviderResponse;

    struct FixedCustomer;

    #[async_trait]
    impl PaystackProvider for FixedCustomer {
        async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            let email = request
                .body
                .as_ref()
                .and_then(|b| b.get("email"))
                .cloned()
                .unwrap_or(Value::Null);
            Ok(ProviderResponse {
                message: "Customer created".into(),
                data: json!({ "email": email, "customer_code": "CUS_xnxdt6s1zg1f4nx" }),
                meta: None,
            })
        }
    }

    fn server() -> McpServer {
        let registry = ToolRegistry::builder(Arc::new(FixedCustomer))
            .add(ToolDescriptor::new(
                "customer_create",
                "Create a customer",
                InputSchema::new().field(FieldSpec::string("email").required()),
                Endpoint::post("/customer"),
            ))
            .build()
            .unwrap();
        McpServer::new(Arc::new(registry))
    }

    async fn roundtrip(server: &McpServer, line: &str) -> Value {
        let out = server
            .handle_message(line, &CancellationToken::new())
            .await
            .expect("expected a response");
        serde_json::from_str(&out).unwrap()
    }

    #[tokio::test]
    async fn initialize_advertises_tools() {
        let resp = roundtrip(
            &server(),
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2025-03-26"}}"#,
        )
        .await;
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2025-03-26");
        assert!(resp["result"]["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn lists_tools_with_schema() {
        let resp = roundtrip(&server(), r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#).await;
        let tools = resp["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "customer_create");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["email"]));
    }

    #[tokio::test]
    async fn call_returns_envelope_as_text() {
        let resp = roundtrip(
            &server(),
            r#"{"jsonrpc":"2.0","id":"a","method":"tools/call","params":{"name":"customer_create","arguments":{"email":"a@b.com"}}}"#,
        )
        .await;
        assert_eq!(resp["result"]["isError"], false);
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        let envelope: Value = serde_json::from_str(text).unwrap();
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["data"]["customer_code"], "CUS_xnxdt6s1zg1f4nx");
    }

    #[tokio::test]
    async fn failed_call_sets_is_error() {
        let resp = roundtrip(
            &server(),
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"customer_create","arguments":{}}}"#,
        )
        .await;
        assert_eq!(resp["result"]["isError"], true);
        let text = resp["result"]["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("email"));
    }

    #[tokio::test]
    async fn unknown_method_and_bad_json() {
        let srv = server();
        let resp = roundtrip(&srv, r#"{"jsonrpc":"2.0","id":4,"method":"resources/list"}"#).await;
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);

        let resp = roundtrip(&srv, "{not json").await;
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
        assert!(resp["id"].is_null());
    }

    #[tokio::test]
    async fn null_id_is_answered_not_treated_as_notification() {
        let resp = roundtrip(&server(), r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).await;
        assert!(resp["id"].is_null());
        assert_eq!(resp["result"], json!({}));
    }

    #[tokio::test]
    async fn long_session_answers_every_request() {
        let (mut input_client, input_server) = tokio::io::duplex(64 * 1024);
        let (output_server, output_client) = tokio::io::duplex(64 * 1024);

        let session = tokio::spawn(Arc::new(server()).serve(
            input_server,
            output_server,
            CancellationToken::new(),
        ));

        let mut responses = BufReader::new(output_client).lines();
        for id in 0..50 {
            let line = format!("{{\"jsonrpc\":\"2.0\",\"id\":{id},\"method\":\"ping\"}}\n");
            input_client.write_all(line.as_bytes()).await.unwrap();
            let reply = responses.next_line().await.unwrap().expect("response line");
            let reply: Value = serde_json::from_str(&reply).unwrap();
            assert_eq!(reply["id"], id);
        }

        drop(input_client);
        session.await.unwrap().unwrap();
        assert!(responses.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let out = server()
            .handle_message(
                r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
                &CancellationToken::new(),
            )
            .await;
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn serve_writes_one_line_per_request() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let (mut input_client, input_server) = tokio::io::duplex(64 * 1024);
        let (output_server, mut output_client) = tokio::io::duplex(64 * 1024);

        input_client.write_all(input.as_bytes()).await.unwrap();
        drop(input_client);

        Arc::new(server())
            .serve(input_server, output_server, CancellationToken::new())
            .await
            .unwrap();

        let mut out = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut output_client, &mut out)
            .await
            .unwrap();
        let ids: Vec<Value> = out
            .lines()
            .map(|l| serde_json::from_str::<Value>(l).unwrap()["id"].clone())
            .collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&json!(1)));
        assert!(ids.contains(&json!(2)));
    }
}
