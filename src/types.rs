use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ErrorKind;

/// A single tool call as received from a transport.
#[derive(Debug, Clone, Deserialize)]
pub struct InvocationRequest {
    #[serde(rename = "name")]
    pub tool_name: String,
    #[serde(rename = "arguments", default)]
    pub raw_parameters: Map<String, Value>,
}

impl InvocationRequest {
    pub fn new(tool_name: impl Into<String>, raw_parameters: Map<String, Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            raw_parameters,
        }
    }

    /// Build a request from any JSON value. Non-object arguments are
    /// treated as an empty parameter set.
    pub fn from_value(tool_name: impl Into<String>, arguments: Value) -> Self {
        let raw_parameters = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(tool_name, raw_parameters)
    }
}

/// A successful Paystack response body, minus the `status` flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    pub message: String,
    pub data: Value,
    /// Pagination metadata on list endpoints.
    pub meta: Option<Value>,
}

/// Structured error carried by a failed envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// The uniform result of every tool call. Exactly one of data or error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WireEnvelope")]
pub enum ResultEnvelope {
    Success { data: Value, meta: Option<Value> },
    Failure { error: EnvelopeError },
}

impl ResultEnvelope {
    pub fn success(response: ProviderResponse) -> Self {
        ResultEnvelope::Success {
            data: response.data,
            meta: response.meta,
        }
    }

    pub fn failure(message: impl Into<String>, kind: ErrorKind) -> Self {
        ResultEnvelope::Failure {
            error: EnvelopeError {
                message: message.into(),
                code: Some(kind.as_str().to_string()),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultEnvelope::Success { .. })
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success { data, .. } => Some(data),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn meta(&self) -> Option<&Value> {
        match self {
            ResultEnvelope::Success { meta, .. } => meta.as_ref(),
            ResultEnvelope::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&EnvelopeError> {
        match self {
            ResultEnvelope::Success { .. } => None,
            ResultEnvelope::Failure { error } => Some(error),
        }
    }

    /// The `error.code` of a failed envelope.
    pub fn error_code(&self) -> Option<&str> {
        self.error().and_then(|e| e.code.as_deref())
    }
}

#[derive(Serialize, Deserialize)]
struct WireEnvelope {
    success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    meta: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<EnvelopeError>,
}

impl TryFrom<WireEnvelope> for ResultEnvelope {
    type Error = String;

    fn try_from(wire: WireEnvelope) -> Result<Self, Self::Error> {
        match (wire.success, wire.error) {
            (true, None) => Ok(ResultEnvelope::Success {
                data: wire.data.unwrap_or(Value::Null),
                meta: wire.meta,
            }),
            (false, Some(error)) if wire.data.is_none() => Ok(ResultEnvelope::Failure { error }),
            (true, Some(_)) => Err("successful envelope must not carry an error".into()),
            (false, Some(_)) => Err("failed envelope must not carry data".into()),
            (false, None) => Err("failed envelope must carry an error".into()),
        }
    }
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            ResultEnvelope::Success { data, meta } => WireEnvelope {
                success: true,
                data: Some(data.clone()),
                meta: meta.clone(),
                error: None,
            },
            ResultEnvelope::Failure { error } => WireEnvelope {
                success: false,
                data: None,
                meta: None,
                error: Some(error.clone()),
            },
        };
        wire.serialize(serializer)
    }
}

/// What `list tools` returns for each registered tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}
