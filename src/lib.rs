//! Paystack operations exposed as callable tools.
//!
//! Every tool call runs the same path: the registry looks the tool up,
//! its [`InputSchema`] validates the loosely-typed parameters, the handler
//! makes one Paystack call behind a panic boundary, and the outcome is
//! normalized into a [`ResultEnvelope`]. Transports (MCP stdio, HTTP) only
//! translate to and from that envelope.

pub mod config;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod redaction;
pub mod schema;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::Config;
pub use error::{ConfigError, ErrorKind, ProviderError, RegistryError, ToolError};
pub use provider::{PaystackClient, PaystackProvider, ProviderRequest};
pub use redaction::{Redactor, SecretKey};
pub use schema::{FieldSpec, InputSchema, ParamType, Params};
pub use tools::{Endpoint, ToolDescriptor, ToolHandler, ToolRegistry};
pub use types::{EnvelopeError, InvocationRequest, ProviderResponse, ResultEnvelope, ToolSummary};

