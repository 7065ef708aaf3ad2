use std::collections::HashSet;
use std::fmt;

use serde_json::{json, Map, Value};

use crate::error::ToolError;

/// JSON type a parameter must have. Coercion is strict: `"5"` is not an
/// integer and `5.5` is not an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    pub fn json_name(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Integer => "integer",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Number => value.is_number(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
        }
    }

    fn zero_value(&self) -> Value {
        match self {
            ParamType::String => Value::String(String::new()),
            ParamType::Integer => json!(0),
            ParamType::Number => json!(0.0),
            ParamType::Boolean => Value::Bool(false),
            ParamType::Object => Value::Object(Map::new()),
            ParamType::Array => Value::Array(Vec::new()),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_name())
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub ty: ParamType,
    pub required: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            required: false,
            default: None,
            description: String::new(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Integer)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Boolean)
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Object)
    }

    pub fn array(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Array)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Value substituted when the caller omits the field. Explicit defaults
    /// are forwarded to Paystack, zero values are not.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn json_schema(&self) -> Value {
        let mut prop = json!({ "type": self.ty.json_name() });
        if !self.description.is_empty() {
            prop["description"] = Value::String(self.description.clone());
        }
        if let Some(ref default) = self.default {
            prop["default"] = default.clone();
        }
        prop
    }
}

/// Declarative input schema for a tool.
#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Pull typed values out of the caller's parameters. Every missing and
    /// every mistyped field is reported in one error.
    pub fn extract(&self, raw: &Map<String, Value>) -> Result<Params, ToolError> {
        let mut missing = Vec::new();
        let mut invalid = Vec::new();
        let mut params = Params::default();

        for field in &self.fields {
            let supplied = match raw.get(&field.name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) if s.trim().is_empty() => None,
                Some(v) => Some(v),
            };

            match supplied {
                Some(value) if field.ty.matches(value) => {
                    params.values.insert(field.name.clone(), value.clone());
                    params.forwarded.insert(field.name.clone());
                }
                Some(_) => invalid.push(format!("{} (expected {})", field.name, field.ty)),
                None if field.required => missing.push(field.name.clone()),
                None => match field.default {
                    Some(ref default) => {
                        params.values.insert(field.name.clone(), default.clone());
                        params.forwarded.insert(field.name.clone());
                    }
                    None => {
                        params.values.insert(field.name.clone(), field.ty.zero_value());
                    }
                },
            }
        }

        if missing.is_empty() && invalid.is_empty() {
            Ok(params)
        } else {
            Err(ToolError::Validation { missing, invalid })
        }
    }

    /// JSON Schema rendering advertised to callers.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Validated parameters. Every declared field has a value; only fields the
/// caller supplied (or that carry an explicit default) are forwarded.
#[derive(Debug, Clone, Default)]
pub struct Params {
    values: Map<String, Value>,
    forwarded: HashSet<String>,
}

impl Params {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn str(&self, name: &str) -> &str {
        self.values.get(name).and_then(Value::as_str).unwrap_or("")
    }

    pub fn i64(&self, name: &str) -> i64 {
        self.values.get(name).and_then(Value::as_i64).unwrap_or(0)
    }

    pub fn f64(&self, name: &str) -> f64 {
        self.values.get(name).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn bool(&self, name: &str) -> bool {
        self.values.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_forwarded(&self, name: &str) -> bool {
        self.forwarded.contains(name)
    }

    /// Fields to send upstream, in schema-independent key order.
    pub fn forwarded(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values
            .iter()
            .filter(|(k, _)| self.forwarded.contains(k.as_str()))
            .map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer_schema() -> InputSchema {
        InputSchema::new()
            .field(FieldSpec::string("email").required().describe("Customer email"))
            .field(FieldSpec::string("first_name"))
            .field(FieldSpec::integer("amount").required())
            .field(FieldSpec::integer("per_page").default(50))
            .field(FieldSpec::boolean("send_notifications"))
    }

    fn raw(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn reports_all_missing_fields_together() {
        let err = customer_schema().extract(&Map::new()).unwrap_err();
        match err {
            ToolError::Validation { missing, invalid } => {
                assert_eq!(missing, vec!["email", "amount"]);
                assert!(invalid.is_empty());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let err = customer_schema()
            .extract(&raw(json!({"email": "  ", "amount": 100})))
            .unwrap_err();
        assert!(err.public_message().contains("email"));
    }

    #[test]
    fn null_counts_as_missing() {
        let err = customer_schema()
            .extract(&raw(json!({"email": null, "amount": 100})))
            .unwrap_err();
        assert!(err.public_message().contains("email"));
    }

    #[test]
    fn strict_types_reject_numeric_strings() {
        let err = customer_schema()
            .extract(&raw(json!({"email": "a@b.com", "amount": "100"})))
            .unwrap_err();
        match err {
            ToolError::Validation { missing, invalid } => {
                assert!(missing.is_empty());
                assert_eq!(invalid, vec!["amount (expected integer)"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn integer_rejects_fractions() {
        let err = customer_schema()
            .extract(&raw(json!({"email": "a@b.com", "amount": 10.5})))
            .unwrap_err();
        assert!(err.public_message().contains("amount"));
    }

    #[test]
    fn number_accepts_integers() {
        let schema = InputSchema::new().field(FieldSpec::number("rate"));
        let params = schema.extract(&raw(json!({"rate": 3}))).unwrap();
        assert_eq!(params.f64("rate"), 3.0);
    }

    #[test]
    fn defaults_and_zero_values() {
        let params = customer_schema()
            .extract(&raw(json!({"email": "a@b.com", "amount": 5000})))
            .unwrap();
        assert_eq!(params.str("email"), "a@b.com");
        assert_eq!(params.i64("amount"), 5000);
        assert_eq!(params.i64("per_page"), 50);
        assert_eq!(params.str("first_name"), "");
        assert!(!params.bool("send_notifications"));

        assert!(params.is_forwarded("per_page"));
        assert!(!params.is_forwarded("first_name"));
        assert!(!params.is_forwarded("send_notifications"));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let params = customer_schema()
            .extract(&raw(json!({"email": "a@b.com", "amount": 1, "secret": "x"})))
            .unwrap();
        assert!(params.value("secret").is_none());
        assert!(params.forwarded().all(|(k, _)| k != "secret"));
    }

    #[test]
    fn json_schema_lists_required_fields() {
        let schema = customer_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["email", "amount"]));
        assert_eq!(schema["properties"]["email"]["description"], "Customer email");
        assert_eq!(schema["properties"]["per_page"]["default"], 50);
    }
}
