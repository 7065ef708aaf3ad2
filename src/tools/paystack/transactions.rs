use crate::schema::{FieldSpec, InputSchema};
use crate::tools::handler::{Endpoint, ToolDescriptor};

use super::{dated, paged};

pub(super) fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "transaction_initialize",
            "Initialize a transaction and get a checkout URL for the customer",
            InputSchema::new()
                .field(FieldSpec::string("email").required().describe("Customer's email address"))
                .field(
                    FieldSpec::integer("amount")
                        .required()
                        .describe("Amount in the subunit of the currency (kobo, pesewas, cents)"),
                )
                .field(FieldSpec::string("currency").describe("Currency code, e.g. NGN"))
                .field(FieldSpec::string("reference").describe("Unique transaction reference"))
                .field(FieldSpec::string("callback_url").describe("URL to redirect to after payment"))
                .field(FieldSpec::string("plan").describe("Plan code for a subscription"))
                .field(FieldSpec::array("channels").describe("Payment channels to allow"))
                .field(FieldSpec::object("metadata")),
            Endpoint::post("/transaction/initialize"),
        ),
        ToolDescriptor::new(
            "transaction_verify",
            "Confirm the status of a transaction by reference",
            InputSchema::new().field(
                FieldSpec::string("reference")
                    .required()
                    .describe("Transaction reference"),
            ),
            Endpoint::get("/transaction/verify/{reference}"),
        ),
        ToolDescriptor::new(
            "transaction_list",
            "List transactions carried out on your integration",
            dated(paged(InputSchema::new()))
                .field(FieldSpec::integer("customer").describe("Filter by customer ID"))
                .field(
                    FieldSpec::string("status")
                        .describe("Filter by status: failed, success, abandoned"),
                )
                .field(FieldSpec::integer("amount").describe("Filter by amount in subunits")),
            Endpoint::get("/transaction"),
        ),
        ToolDescriptor::new(
            "transaction_fetch",
            "Get details of a transaction by ID",
            InputSchema::new().field(FieldSpec::integer("id").required().describe("Transaction ID")),
            Endpoint::get("/transaction/{id}"),
        ),
        ToolDescriptor::new(
            "transaction_totals",
            "Total amount received on your integration",
            dated(paged(InputSchema::new())),
            Endpoint::get("/transaction/totals"),
        ),
        ToolDescriptor::new(
            "transaction_charge_authorization",
            "Charge a reusable authorization from a previous transaction",
            InputSchema::new()
                .field(FieldSpec::string("email").required())
                .field(FieldSpec::integer("amount").required().describe("Amount in subunits"))
                .field(
                    FieldSpec::string("authorization_code")
                        .required()
                        .describe("Authorization code (AUTH_...)"),
                )
                .field(FieldSpec::string("reference"))
                .field(FieldSpec::string("currency"))
                .field(FieldSpec::object("metadata")),
            Endpoint::post("/transaction/charge_authorization"),
        ),
    ]
}
