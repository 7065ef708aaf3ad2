use std::fmt;

use serde::Serialize;

/// Failure reaching or talking to the Paystack API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("Paystack returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Paystack rejected the request: {message}")]
    Rejected { message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// The provider's own explanation, when the error body carries one.
    pub fn provider_message(&self) -> Option<String> {
        match self {
            ProviderError::Api { body, .. } => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|v| v.get("message")?.as_str().map(str::to_string))
                .filter(|m| !m.trim().is_empty()),
            ProviderError::Rejected { message } if !message.trim().is_empty() => {
                Some(message.clone())
            }
            _ => None,
        }
    }
}

/// Everything that can go wrong between receiving a tool call and
/// producing its envelope.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("invalid parameters (missing: {missing:?}, invalid: {invalid:?})")]
    Validation {
        missing: Vec<String>,
        invalid: Vec<String>,
    },
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invocation cancelled")]
    Cancelled,
}

/// Stable classification carried as `error.code` in failure envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ValidationError,
    ProviderError,
    TransportError,
    InternalError,
    UnknownTool,
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "validation_error",
            ErrorKind::ProviderError => "provider_error",
            ErrorKind::TransportError => "transport_error",
            ErrorKind::InternalError => "internal_error",
            ErrorKind::UnknownTool => "unknown_tool",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) const INTERNAL_ERROR_MESSAGE: &str = "Internal error while executing tool";

impl ToolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ToolError::Validation { .. } => ErrorKind::ValidationError,
            ToolError::Provider(ProviderError::Transport(_)) => ErrorKind::TransportError,
            ToolError::Provider(_) => ErrorKind::ProviderError,
            ToolError::Internal(_) => ErrorKind::InternalError,
            ToolError::UnknownTool(_) => ErrorKind::UnknownTool,
            ToolError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Message that is safe to hand back to the caller. Internal detail
    /// stays in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ToolError::Validation { missing, invalid } => {
                let mut parts = Vec::new();
                if !missing.is_empty() {
                    parts.push(format!("Missing required parameter(s): {}", missing.join(", ")));
                }
                if !invalid.is_empty() {
                    parts.push(format!("Invalid parameter(s): {}", invalid.join(", ")));
                }
                parts.join("; ")
            }
            ToolError::Provider(err) => match err.provider_message() {
                Some(message) => message,
                None => match err {
                    ProviderError::Transport(_) => "Could not reach Paystack".into(),
                    ProviderError::Api { status, .. } => {
                        format!("Paystack request failed with status {status}")
                    }
                    ProviderError::Rejected { .. } => "Paystack rejected the request".into(),
                    ProviderError::Malformed(_) => {
                        "Paystack returned an unexpected response".into()
                    }
                },
            },
            ToolError::Internal(_) => INTERNAL_ERROR_MESSAGE.into(),
            ToolError::UnknownTool(name) => format!("Unknown tool: {name}"),
            ToolError::Cancelled => "Invocation cancelled before Paystack responded".into(),
        }
    }
}

/// Misconfigured tool catalog. Raised while building the registry, before
/// any transport starts.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
    #[error("invalid descriptor for {tool}: {reason}")]
    InvalidDescriptor { tool: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
