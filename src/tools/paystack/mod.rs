//! The Paystack tool catalog.
//!
//! Each operation is a [`ToolDescriptor`] pairing an input schema with an
//! [`Endpoint`]. Adding an operation means adding a descriptor here, not a
//! new handler.

mod accounts;
mod billing;
mod customers;
mod transactions;
mod transfers;

use std::sync::Arc;

use crate::error::RegistryError;
use crate::provider::PaystackProvider;
use crate::redaction::Redactor;
use crate::schema::{FieldSpec, InputSchema};

use super::handler::ToolDescriptor;
use super::registry::ToolRegistry;

/// Every Paystack tool, grouped by API resource.
pub fn catalog() -> Vec<ToolDescriptor> {
    let mut tools = Vec::new();
    tools.extend(customers::tools());
    tools.extend(transactions::tools());
    tools.extend(transfers::tools());
    tools.extend(accounts::tools());
    tools.extend(billing::tools());
    tools
}

/// Registry holding the full catalog, bound to `provider`.
pub fn registry(
    provider: Arc<dyn PaystackProvider>,
    redactor: Redactor,
) -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::builder(provider)
        .with_redactor(redactor)
        .extend(catalog())
        .build()
}

/// `perPage`/`page` paging parameters shared by list endpoints.
fn paged(schema: InputSchema) -> InputSchema {
    schema
        .field(
            FieldSpec::integer("perPage")
                .default(50)
                .describe("Number of records per page"),
        )
        .field(FieldSpec::integer("page").describe("Page number to retrieve"))
}

/// `from`/`to` date window shared by list endpoints.
fn dated(schema: InputSchema) -> InputSchema {
    schema
        .field(FieldSpec::string("from").describe("Start date, e.g. 2024-01-01T00:00:00.000Z"))
        .field(FieldSpec::string("to").describe("End date, e.g. 2024-12-31T23:59:59.000Z"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::error::ProviderError;
    use crate::provider::ProviderRequest;
    use crate::types::{InvocationRequest, ProviderResponse};

    /// Echoes the request back and counts how often it was called.
    #[derive(Default)]
    struct EchoProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PaystackProvider for EchoProvider {
        async fn send(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ProviderResponse {
                message: "ok".into(),
                data: json!({
                    "method": request.method.as_str(),
                    "path": request.path(),
                    "query": request.query,
                    "body": request.body,
                }),
                meta: None,
            })
        }
    }

    fn full_registry() -> ToolRegistry {
        registry(Arc::new(EchoProvider::default()), Redactor::new()).unwrap()
    }

    fn counting_registry() -> (ToolRegistry, Arc<EchoProvider>) {
        let provider = Arc::new(EchoProvider::default());
        let reg = registry(provider.clone(), Redactor::new()).unwrap();
        (reg, provider)
    }

    #[tokio::test]
    async fn every_tool_rejects_missing_required_fields_without_calling_paystack() {
        let (reg, provider) = counting_registry();

        for tool in catalog() {
            let required: Vec<&str> = tool
                .schema
                .fields()
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name.as_str())
                .collect();
            if required.is_empty() {
                continue;
            }

            let env = reg
                .invoke(&InvocationRequest::from_value(tool.name.as_str(), json!({})))
                .await;
            assert!(!env.is_success(), "{} succeeded without parameters", tool.name);
            assert!(env.data().is_none());
            assert_eq!(env.error_code(), Some("validation_error"), "{}", tool.name);
            let message = &env.error().unwrap().message;
            for name in required {
                assert!(message.contains(name), "{}: {name} not named in {message:?}", tool.name);
            }
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dot_path_values_never_reach_another_endpoint() {
        let (reg, provider) = counting_registry();
        let calls = [
            ("customer_fetch", json!({"email_or_code": ".."})),
            ("transfer_fetch", json!({"id_or_code": "."})),
            ("transaction_verify", json!({"reference": ".."})),
            (
                "customer_validate",
                json!({
                    "code": "..",
                    "first_name": "Ada",
                    "last_name": "Obi",
                    "bvn": "20012345677",
                    "bank_code": "007",
                    "account_number": "0123456789",
                }),
            ),
        ];

        for (name, args) in calls {
            let env = reg.invoke(&InvocationRequest::from_value(name, args)).await;
            assert_eq!(env.error_code(), Some("validation_error"), "{name}");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn catalog_builds_without_conflicts() {
        let reg = full_registry();
        let names: HashSet<&str> = reg.tool_names().into_iter().collect();
        assert_eq!(names.len(), reg.len());
        for expected in [
            "customer_create",
            "customer_list",
            "transaction_initialize",
            "transaction_verify",
            "transfer_initiate",
            "transfer_recipient_create",
            "balance_check",
            "bank_resolve_account",
            "refund_create",
            "plan_create",
            "subscription_create",
        ] {
            assert!(names.contains(expected), "missing {expected}");
        }
    }

    #[test]
    fn every_tool_has_a_description() {
        for tool in catalog() {
            assert!(!tool.description.is_empty(), "{} has no description", tool.name);
        }
    }

    #[tokio::test]
    async fn transaction_verify_uses_reference_in_path() {
        let env = full_registry()
            .invoke(&InvocationRequest::from_value(
                "transaction_verify",
                json!({"reference": "T123 45"}),
            ))
            .await;
        let data = env.data().unwrap();
        assert_eq!(data["method"], "GET");
        assert_eq!(data["path"], "/transaction/verify/T123 45");
    }

    #[tokio::test]
    async fn transfer_initiate_defaults_source_to_balance() {
        let env = full_registry()
            .invoke(&InvocationRequest::from_value(
                "transfer_initiate",
                json!({"amount": 50000, "recipient": "RCP_abc", "reason": "Payout"}),
            ))
            .await;
        let data = env.data().unwrap();
        assert_eq!(data["path"], "/transfer");
        assert_eq!(
            data["body"],
            json!({"source": "balance", "amount": 50000, "recipient": "RCP_abc", "reason": "Payout"})
        );
    }

    #[tokio::test]
    async fn transfer_initiate_requires_amount_and_recipient() {
        let env = full_registry()
            .invoke(&InvocationRequest::from_value("transfer_initiate", json!({})))
            .await;
        let message = &env.error().unwrap().message;
        assert!(message.contains("amount"));
        assert!(message.contains("recipient"));
    }

    #[tokio::test]
    async fn customer_list_sends_paging_as_query() {
        let env = full_registry()
            .invoke(&InvocationRequest::from_value("customer_list", json!({"page": 3})))
            .await;
        let data = env.data().unwrap();
        let query = data["query"].as_array().unwrap();
        assert!(query.contains(&json!(["page", "3"])));
        assert!(query.contains(&json!(["perPage", "50"])));
        assert!(data["body"].is_null());
    }

    #[tokio::test]
    async fn balance_check_takes_no_parameters() {
        let env = full_registry()
            .invoke(&InvocationRequest::from_value("balance_check", json!({})))
            .await;
        assert_eq!(env.data().unwrap()["path"], "/balance");
    }
}
