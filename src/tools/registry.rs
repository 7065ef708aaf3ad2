use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::handler::ToolDescriptor;
use crate::error::{RegistryError, ToolError};
use crate::normalize::into_envelope;
use crate::provider::{guarded, PaystackProvider};
use crate::redaction::Redactor;
use crate::types::{InvocationRequest, ProviderResponse, ResultEnvelope, ToolSummary};

/// Catalog of available tools. Built once at startup and read-only after,
/// so it can be shared across concurrent invocations without locking.
pub struct ToolRegistry {
    provider: Arc<dyn PaystackProvider>,
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
    redactor: Redactor,
}

/// Collects descriptors and validates them as a whole.
pub struct ToolRegistryBuilder {
    provider: Arc<dyn PaystackProvider>,
    tools: Vec<ToolDescriptor>,
    redactor: Redactor,
}

impl ToolRegistryBuilder {
    /// Register a tool.
    pub fn add(mut self, descriptor: ToolDescriptor) -> Self {
        self.tools.push(descriptor);
        self
    }

    pub fn extend(mut self, descriptors: impl IntoIterator<Item = ToolDescriptor>) -> Self {
        self.tools.extend(descriptors);
        self
    }

    /// Redactor applied to every outgoing error message.
    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    /// Fails on duplicate names or on a handler whose path needs a
    /// parameter the schema does not require.
    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut index = HashMap::with_capacity(self.tools.len());

        for (i, tool) in self.tools.iter().enumerate() {
            if tool.name.trim().is_empty() {
                return Err(RegistryError::InvalidDescriptor {
                    tool: tool.name.clone(),
                    reason: "tool name must be non-empty".into(),
                });
            }
            for param in tool.handler.path_params() {
                match tool.schema.get(param) {
                    Some(field) if field.required => {}
                    _ => {
                        return Err(RegistryError::InvalidDescriptor {
                            tool: tool.name.clone(),
                            reason: format!("path parameter {param} must be a required field"),
                        })
                    }
                }
            }
            if index.insert(tool.name.clone(), i).is_some() {
                return Err(RegistryError::DuplicateTool(tool.name.clone()));
            }
        }

        info!(tools = self.tools.len(), "tool registry built");

        Ok(ToolRegistry {
            provider: self.provider,
            tools: self.tools,
            index,
            redactor: self.redactor,
        })
    }
}

impl ToolRegistry {
    pub fn builder(provider: Arc<dyn PaystackProvider>) -> ToolRegistryBuilder {
        ToolRegistryBuilder {
            provider,
            tools: Vec::new(),
            redactor: Redactor::new(),
        }
    }

    /// Name, description and input schema of every tool, in registration order.
    pub fn list(&self) -> Vec<ToolSummary> {
        self.tools.iter().map(ToolDescriptor::summary).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Invoke a tool and normalize the outcome. Never panics across this
    /// boundary; every failure comes back as a failed envelope.
    pub async fn invoke(&self, request: &InvocationRequest) -> ResultEnvelope {
        let result = self.execute(request).await;
        into_envelope(&request.tool_name, result, &self.redactor)
    }

    /// Like [`invoke`](Self::invoke), but gives up on the in-flight call when
    /// `cancel` fires. Nothing is sent to Paystack to undo a call that may
    /// already have landed.
    pub async fn invoke_with_cancel(
        &self,
        request: &InvocationRequest,
        cancel: CancellationToken,
    ) -> ResultEnvelope {
        let result = tokio::select! {
            result = self.execute(request) => result,
            _ = cancel.cancelled() => {
                info!(tool = %request.tool_name, "invocation cancelled, abandoning provider call");
                Err(ToolError::Cancelled)
            }
        };
        into_envelope(&request.tool_name, result, &self.redactor)
    }

    async fn execute(&self, request: &InvocationRequest) -> Result<ProviderResponse, ToolError> {
        let tool = self
            .get(&request.tool_name)
            .ok_or_else(|| ToolError::UnknownTool(request.tool_name.clone()))?;

        let params = tool.schema.extract(&request.raw_parameters)?;
        debug!(tool = %tool.name, "parameters validated");

        guarded(tool.handler.call(self.provider.as_ref(), &params)).await
    }

    /// Search tools by query. Matches against name and description.
    /// Returns compact summaries (name + description only, no input schema).
    pub fn search(&self, query: &str) -> Vec<Value> {
        let query_lower = query.to_lowercase();
        let terms: Vec<&str> = query_lower.split_whitespace().collect();

        self.tools
            .iter()
            .filter(|t| {
                let haystack = format!("{} {}", t.name, t.description).to_lowercase();
                terms.iter().any(|term| haystack.contains(term))
            })
            .map(|t| {
                json!({
                    "name": t.name,
                    "description": t.description,
                })
            })
            .collect()
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}
