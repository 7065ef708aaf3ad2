use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use reqwest::header::ACCEPT;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use crate::config::{Config, DEFAULT_BASE_URL};
use crate::error::{ProviderError, ToolError};
use crate::redaction::{Redactor, SecretKey};
use crate::types::ProviderResponse;

/// One call against the Paystack REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRequest {
    pub method: Method,
    /// Path segments, unencoded. `["customer", "CUS_x"]` → `/customer/CUS_x`.
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ProviderRequest {
    pub fn new(method: Method, segments: Vec<String>) -> Self {
        Self {
            method,
            segments,
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self::new(Method::GET, segments.into_iter().map(Into::into).collect())
    }

    pub fn post<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self::new(Method::POST, segments.into_iter().map(Into::into).collect())
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Display form of the path, for logs.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Pure Paystack API call. Request in, response out. Implementations make
/// exactly one network call and never retry: a retried transfer or charge
/// can move money twice.
#[async_trait]
pub trait PaystackProvider: Send + Sync {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError>;
}

#[async_trait]
impl<P: PaystackProvider + ?Sized> PaystackProvider for Arc<P> {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        (**self).send(request).await
    }
}

/// Paystack REST client. The inner `reqwest::Client` pools connections and
/// is shared by concurrent invocations.
pub struct PaystackClient {
    client: reqwest::Client,
    base_url: String,
    secret_key: SecretKey,
    redactor: Redactor,
}

impl PaystackClient {
    pub fn new(secret_key: SecretKey) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            redactor: Redactor::new().with_secret(&secret_key),
            secret_key,
        }
    }

    /// Build a client with the configured base URL and request timeout.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("paystack-tools/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self::new(config.secret_key.clone())
            .with_client(client)
            .with_base_url(&config.base_url))
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn url_for(&self, segments: &[String]) -> Result<url::Url, ProviderError> {
        let mut url = url::Url::parse(&self.base_url)
            .map_err(|e| ProviderError::Transport(format!("invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProviderError::Transport("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl PaystackProvider for PaystackClient {
    async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let url = self.url_for(&request.segments)?;

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .bearer_auth(self.secret_key.expose())
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(ref body) = request.body {
            builder = builder.json(body);
        }

        debug!(method = %request.method, path = %request.path(), "calling Paystack");

        let resp = builder
            .send()
            .await
            .map_err(|e| ProviderError::Transport(self.redactor.redact(&e.to_string())))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ProviderError::Transport(self.redactor.redact(&e.to_string())))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: self.redactor.redact(&text),
            });
        }

        parse_body(&text)
    }
}

/// Classify a 2xx Paystack body. Anything not shaped like
/// `{"status": bool, "message": ..., "data": ...}` is malformed, never "empty".
pub fn parse_body(text: &str) -> Result<ProviderResponse, ProviderError> {
    let parsed: Value =
        serde_json::from_str(text).map_err(|e| ProviderError::Malformed(e.to_string()))?;

    let status = parsed
        .get("status")
        .and_then(Value::as_bool)
        .ok_or_else(|| ProviderError::Malformed("missing boolean `status` field".into()))?;
    let message = parsed
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    if !status {
        return Err(ProviderError::Rejected { message });
    }

    Ok(ProviderResponse {
        message,
        data: parsed.get("data").cloned().unwrap_or(Value::Null),
        meta: parsed.get("meta").cloned(),
    })
}

/// Run a provider call behind a panic boundary. A panic anywhere inside the
/// call becomes an internal error instead of unwinding into the transport.
pub async fn guarded<F>(call: F) -> Result<ProviderResponse, ToolError>
where
    F: Future<Output = Result<ProviderResponse, ToolError>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ToolError::Internal(format!(
            "provider call panicked: {}",
            panic_message(payload.as_ref())
        ))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}
