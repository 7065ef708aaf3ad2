use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::ErrorKind;
use crate::tools::ToolRegistry;
use crate::types::{InvocationRequest, ResultEnvelope};

/// JSON body returned by `POST /tools/{name}`.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HttpResponse {
    pub status: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl HttpResponse {
    fn from_envelope(tool: &str, envelope: ResultEnvelope) -> (StatusCode, Self) {
        match envelope {
            ResultEnvelope::Success { data, meta } => (
                StatusCode::OK,
                Self {
                    status: true,
                    message: format!("{tool} completed"),
                    data: Some(data),
                    meta,
                    code: None,
                },
            ),
            ResultEnvelope::Failure { error } => {
                let status = match error.code.as_deref() {
                    Some("validation_error") => StatusCode::BAD_REQUEST,
                    Some("unknown_tool") => StatusCode::NOT_FOUND,
                    Some("provider_error") | Some("transport_error") => StatusCode::BAD_GATEWAY,
                    Some("cancelled") => StatusCode::REQUEST_TIMEOUT,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (
                    status,
                    Self {
                        status: false,
                        message: error.message,
                        data: None,
                        meta: None,
                        code: error.code,
                    },
                )
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    q: Option<String>,
}

pub fn router(registry: Arc<ToolRegistry>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .with_state(registry)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn list_tools(
    State(registry): State<Arc<ToolRegistry>>,
    Query(query): Query<ListQuery>,
) -> Json<Value> {
    match query.q.filter(|q| !q.trim().is_empty()) {
        Some(q) => Json(json!({ "tools": registry.search(&q) })),
        None => Json(json!({ "tools": registry.list() })),
    }
}

// Dropping this future on client disconnect abandons the provider call.
async fn call_tool(
    State(registry): State<Arc<ToolRegistry>>,
    Path(name): Path<String>,
    body: Bytes,
) -> (StatusCode, Json<HttpResponse>) {
    let raw_parameters = if body.iter().all(u8::is_ascii_whitespace) {
        Map::new()
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(Value::Object(map)) => map,
            _ => {
                let envelope = ResultEnvelope::failure(
                    "Request body must be a JSON object",
                    ErrorKind::ValidationError,
                );
                let (status, resp) = HttpResponse::from_envelope(&name, envelope);
                return (status, Json(resp));
            }
        }
    };

    let envelope = registry
        .invoke(&InvocationRequest::new(name.clone(), raw_parameters))
        .await;
    let (status, resp) = HttpResponse::from_envelope(&name, envelope);
    (status, Json(resp))
}

/// Serve the HTTP API on `addr` until `shutdown` fires.
pub async fn serve(
    registry: Arc<ToolRegistry>,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, tools = registry.len(), "serving HTTP");
    axum::serve(listener, router(registry))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}
