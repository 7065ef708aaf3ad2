use crate::schema::{FieldSpec, InputSchema};
use crate::tools::handler::{Endpoint, ToolDescriptor};

use super::{dated, paged};

pub(super) fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "customer_create",
            "Create a customer on your Paystack integration",
            InputSchema::new()
                .field(FieldSpec::string("email").required().describe("Customer's email address"))
                .field(FieldSpec::string("first_name").describe("Customer's first name"))
                .field(FieldSpec::string("last_name").describe("Customer's last name"))
                .field(FieldSpec::string("phone").describe("Customer's phone number"))
                .field(FieldSpec::object("metadata").describe("Additional key/value data")),
            Endpoint::post("/customer"),
        ),
        ToolDescriptor::new(
            "customer_list",
            "List customers available on your integration",
            dated(paged(InputSchema::new())),
            Endpoint::get("/customer"),
        ),
        ToolDescriptor::new(
            "customer_fetch",
            "Get details of a customer by email or customer code",
            InputSchema::new().field(
                FieldSpec::string("email_or_code")
                    .required()
                    .describe("Customer email or customer code (CUS_...)"),
            ),
            Endpoint::get("/customer/{email_or_code}"),
        ),
        ToolDescriptor::new(
            "customer_update",
            "Update a customer's details",
            InputSchema::new()
                .field(FieldSpec::string("code").required().describe("Customer code (CUS_...)"))
                .field(FieldSpec::string("first_name"))
                .field(FieldSpec::string("last_name"))
                .field(FieldSpec::string("phone"))
                .field(FieldSpec::object("metadata")),
            Endpoint::put("/customer/{code}"),
        ),
        ToolDescriptor::new(
            "customer_validate",
            "Validate a customer's identity against their bank account",
            InputSchema::new()
                .field(FieldSpec::string("code").required().describe("Customer code (CUS_...)"))
                .field(FieldSpec::string("first_name").required())
                .field(FieldSpec::string("last_name").required())
                .field(
                    FieldSpec::string("type")
                        .default("bank_account")
                        .describe("Identification type"),
                )
                .field(FieldSpec::string("country").default("NG").describe("Two-letter country code"))
                .field(FieldSpec::string("bvn").required().describe("Bank Verification Number"))
                .field(FieldSpec::string("bank_code").required())
                .field(FieldSpec::string("account_number").required()),
            Endpoint::post("/customer/{code}/identification"),
        ),
    ]
}
