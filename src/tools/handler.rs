use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::ToolError;
use crate::provider::{PaystackProvider, ProviderRequest};
use crate::schema::{InputSchema, Params};
use crate::types::{ProviderResponse, ToolSummary};

/// A tool's execution handler. Receives already-validated parameters and
/// performs one provider call.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(
        &self,
        provider: &dyn PaystackProvider,
        params: &Params,
    ) -> Result<ProviderResponse, ToolError>;

    /// Parameters the handler interpolates into the request path. The
    /// registry checks these are required fields of the schema.
    fn path_params(&self) -> Vec<&str> {
        Vec::new()
    }
}

/// Where non-path parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Query,
    Body,
}

/// Declarative handler: an HTTP method and a path template such as
/// `/customer/{code}`. Placeholders are filled from parameters of the same
/// name; every other forwarded parameter goes to the query string or body.
#[derive(Debug, Clone)]
pub struct Endpoint {
    method: Method,
    path: &'static str,
    placement: Placement,
}

impl Endpoint {
    pub fn new(method: Method, path: &'static str, placement: Placement) -> Self {
        Self {
            method,
            path,
            placement,
        }
    }

    pub fn get(path: &'static str) -> Self {
        Self::new(Method::GET, path, Placement::Query)
    }

    pub fn post(path: &'static str) -> Self {
        Self::new(Method::POST, path, Placement::Body)
    }

    pub fn put(path: &'static str) -> Self {
        Self::new(Method::PUT, path, Placement::Body)
    }

    fn placeholder(segment: &str) -> Option<&str> {
        segment.strip_prefix('{')?.strip_suffix('}')
    }

    fn segments(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter(|s| !s.is_empty())
    }

    /// Turn validated parameters into the provider request.
    pub fn build(&self, params: &Params) -> Result<ProviderRequest, ToolError> {
        let mut segments = Vec::new();
        let mut invalid = Vec::new();
        for segment in self.segments() {
            match Self::placeholder(segment) {
                Some(name) => {
                    let value = params.value(name).and_then(scalar_to_string).ok_or_else(|| {
                        ToolError::Internal(format!("path parameter {name} has no scalar value"))
                    })?;
                    // URL normalization drops dot segments, which would
                    // silently route to the parent endpoint.
                    if matches!(value.trim(), "" | "." | "..") {
                        invalid.push(format!("{name} (not a valid identifier)"));
                    }
                    segments.push(value);
                }
                None => segments.push(segment.to_string()),
            }
        }
        if !invalid.is_empty() {
            return Err(ToolError::Validation {
                missing: Vec::new(),
                invalid,
            });
        }

        let path_params = self.path_params();
        let rest = params
            .forwarded()
            .filter(|(name, _)| !path_params.contains(name));

        let mut request = ProviderRequest::new(self.method.clone(), segments);
        match self.placement {
            Placement::Query => {
                for (name, value) in rest {
                    let rendered = scalar_to_string(value).unwrap_or_else(|| value.to_string());
                    request = request.with_query(name, rendered);
                }
            }
            Placement::Body => {
                let body: Map<String, Value> =
                    rest.map(|(k, v)| (k.to_string(), v.clone())).collect();
                request = request.with_body(Value::Object(body));
            }
        }
        Ok(request)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[async_trait]
impl ToolHandler for Endpoint {
    async fn call(
        &self,
        provider: &dyn PaystackProvider,
        params: &Params,
    ) -> Result<ProviderResponse, ToolError> {
        let request = self.build(params)?;
        Ok(provider.send(request).await?)
    }

    fn path_params(&self) -> Vec<&str> {
        self.segments().filter_map(Self::placeholder).collect()
    }
}

/// A tool definition: name and schema for the caller + handler for execution.
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub schema: InputSchema,
    pub(crate) handler: Box<dyn ToolHandler>,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: InputSchema,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            schema,
            handler: Box::new(handler),
        }
    }

    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            name: self.name.clone(),
            description: self.description.clone(),
            input_schema: self.schema.to_json_schema(),
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use serde_json::json;

    fn params(schema: &InputSchema, raw: Value) -> Params {
        schema.extract(raw.as_object().unwrap()).unwrap()
    }

    #[test]
    fn fills_path_placeholders() {
        let schema = InputSchema::new()
            .field(FieldSpec::string("code").required())
            .field(FieldSpec::string("first_name"));
        let endpoint = Endpoint::put("/customer/{code}");
        let req = endpoint
            .build(&params(&schema, json!({"code": "CUS_1", "first_name": "Ada"})))
            .unwrap();
        assert_eq!(req.method, Method::PUT);
        assert_eq!(req.segments, vec!["customer", "CUS_1"]);
        assert_eq!(req.body, Some(json!({"first_name": "Ada"})));
    }

    #[test]
    fn dot_segments_are_rejected_before_any_request() {
        let schema = InputSchema::new().field(FieldSpec::string("code").required());
        let endpoint = Endpoint::get("/customer/{code}");
        for bad in ["..", ".", " .. "] {
            let err = endpoint
                .build(&params(&schema, json!({"code": bad})))
                .unwrap_err();
            match err {
                ToolError::Validation { missing, invalid } => {
                    assert!(missing.is_empty());
                    assert_eq!(invalid.len(), 1);
                    assert!(invalid[0].starts_with("code"), "got {invalid:?}");
                }
                other => panic!("expected validation error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn dotted_values_that_are_not_dot_segments_pass() {
        let schema = InputSchema::new().field(FieldSpec::string("code").required());
        let req = Endpoint::get("/customer/{code}")
            .build(&params(&schema, json!({"code": "a.b@c.com"})))
            .unwrap();
        assert_eq!(req.segments, vec!["customer", "a.b@c.com"]);
    }

    #[test]
    fn integer_path_params_render_plainly() {
        let schema = InputSchema::new().field(FieldSpec::integer("id").required());
        let req = Endpoint::get("/transaction/{id}")
            .build(&params(&schema, json!({"id": 4099260516u64})))
            .unwrap();
        assert_eq!(req.segments, vec!["transaction", "4099260516"]);
        assert!(req.query.is_empty());
    }

    #[test]
    fn query_only_carries_forwarded_fields() {
        let schema = InputSchema::new()
            .field(FieldSpec::integer("perPage").default(50))
            .field(FieldSpec::integer("page"))
            .field(FieldSpec::string("from"));
        let req = Endpoint::get("/customer")
            .build(&params(&schema, json!({"page": 2})))
            .unwrap();
        let mut query = req.query.clone();
        query.sort();
        assert_eq!(
            query,
            vec![("page".to_string(), "2".to_string()), ("perPage".to_string(), "50".to_string())]
        );
    }

    #[test]
    fn post_without_fields_sends_empty_object() {
        let req = Endpoint::post("/transfer/disable_otp")
            .build(&Params::default())
            .unwrap();
        assert_eq!(req.body, Some(json!({})));
    }

    #[test]
    fn reports_path_params() {
        let endpoint = Endpoint::post("/customer/{code}/identification");
        assert_eq!(endpoint.path_params(), vec!["code"]);
        assert!(Endpoint::get("/balance").path_params().is_empty());
    }
}
