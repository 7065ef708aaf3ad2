use crate::schema::{FieldSpec, InputSchema};
use crate::tools::handler::{Endpoint, ToolDescriptor};

use super::{dated, paged};

pub(super) fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "refund_create",
            "Refund a transaction, fully or partially",
            InputSchema::new()
                .field(
                    FieldSpec::string("transaction")
                        .required()
                        .describe("Transaction reference or ID"),
                )
                .field(FieldSpec::integer("amount").describe("Amount to refund in subunits; defaults to full"))
                .field(FieldSpec::string("currency"))
                .field(FieldSpec::string("customer_note"))
                .field(FieldSpec::string("merchant_note")),
            Endpoint::post("/refund"),
        ),
        ToolDescriptor::new(
            "refund_list",
            "List refunds on your integration",
            dated(paged(InputSchema::new()))
                .field(FieldSpec::string("transaction").describe("Filter by transaction"))
                .field(FieldSpec::string("currency")),
            Endpoint::get("/refund"),
        ),
        ToolDescriptor::new(
            "plan_create",
            "Create a subscription plan",
            InputSchema::new()
                .field(FieldSpec::string("name").required())
                .field(FieldSpec::integer("amount").required().describe("Amount in subunits"))
                .field(
                    FieldSpec::string("interval")
                        .required()
                        .describe("hourly, daily, weekly, monthly, quarterly, biannually or annually"),
                )
                .field(FieldSpec::string("description"))
                .field(FieldSpec::string("currency"))
                .field(FieldSpec::integer("invoice_limit").describe("Number of invoices to raise")),
            Endpoint::post("/plan"),
        ),
        ToolDescriptor::new(
            "plan_list",
            "List subscription plans",
            paged(InputSchema::new())
                .field(FieldSpec::string("status"))
                .field(FieldSpec::string("interval"))
                .field(FieldSpec::integer("amount")),
            Endpoint::get("/plan"),
        ),
        ToolDescriptor::new(
            "subscription_create",
            "Subscribe a customer to a plan",
            InputSchema::new()
                .field(FieldSpec::string("customer").required().describe("Customer email or code"))
                .field(FieldSpec::string("plan").required().describe("Plan code (PLN_...)"))
                .field(FieldSpec::string("authorization").describe("Authorization code to charge"))
                .field(FieldSpec::string("start_date").describe("ISO 8601 date of the first debit")),
            Endpoint::post("/subscription"),
        ),
        ToolDescriptor::new(
            "subscription_list",
            "List subscriptions on your integration",
            paged(InputSchema::new())
                .field(FieldSpec::integer("customer").describe("Filter by customer ID"))
                .field(FieldSpec::integer("plan").describe("Filter by plan ID")),
            Endpoint::get("/subscription"),
        ),
        ToolDescriptor::new(
            "subscription_disable",
            "Disable a subscription",
            InputSchema::new()
                .field(FieldSpec::string("code").required().describe("Subscription code (SUB_...)"))
                .field(FieldSpec::string("token").required().describe("Email token")),
            Endpoint::post("/subscription/disable"),
        ),
        ToolDescriptor::new(
            "page_create",
            "Create a hosted payment page",
            InputSchema::new()
                .field(FieldSpec::string("name").required())
                .field(FieldSpec::string("description"))
                .field(FieldSpec::integer("amount").describe("Fixed amount in subunits"))
                .field(FieldSpec::string("slug"))
                .field(FieldSpec::string("redirect_url")),
            Endpoint::post("/page"),
        ),
        ToolDescriptor::new(
            "page_list",
            "List payment pages",
            dated(paged(InputSchema::new())),
            Endpoint::get("/page"),
        ),
    ]
}
