use crate::schema::{FieldSpec, InputSchema};
use crate::tools::handler::{Endpoint, ToolDescriptor};

use super::{dated, paged};

pub(super) fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "transfer_recipient_create",
            "Create a beneficiary for transfers",
            InputSchema::new()
                .field(
                    FieldSpec::string("type")
                        .default("nuban")
                        .describe("Recipient type: nuban, ghipss, mobile_money, basa"),
                )
                .field(FieldSpec::string("name").required().describe("Recipient's name"))
                .field(FieldSpec::string("account_number").required())
                .field(FieldSpec::string("bank_code").required())
                .field(FieldSpec::string("currency").describe("Currency for the account"))
                .field(FieldSpec::string("description"))
                .field(FieldSpec::object("metadata")),
            Endpoint::post("/transferrecipient"),
        ),
        ToolDescriptor::new(
            "transfer_recipient_list",
            "List transfer recipients on your integration",
            dated(paged(InputSchema::new())),
            Endpoint::get("/transferrecipient"),
        ),
        ToolDescriptor::new(
            "transfer_initiate",
            "Send money to a transfer recipient from your balance",
            InputSchema::new()
                .field(
                    FieldSpec::string("source")
                        .default("balance")
                        .describe("Where to send the money from"),
                )
                .field(FieldSpec::integer("amount").required().describe("Amount in subunits"))
                .field(
                    FieldSpec::string("recipient")
                        .required()
                        .describe("Transfer recipient code (RCP_...)"),
                )
                .field(FieldSpec::string("reason").describe("Narration for the transfer"))
                .field(FieldSpec::string("currency"))
                .field(
                    FieldSpec::string("reference")
                        .describe("Unique reference; reuse it to make retries idempotent"),
                ),
            Endpoint::post("/transfer"),
        ),
        ToolDescriptor::new(
            "transfer_finalize",
            "Finalize a transfer that requires OTP confirmation",
            InputSchema::new()
                .field(FieldSpec::string("transfer_code").required().describe("Transfer code (TRF_...)"))
                .field(FieldSpec::string("otp").required().describe("OTP sent to the business phone")),
            Endpoint::post("/transfer/finalize_transfer"),
        ),
        ToolDescriptor::new(
            "transfer_list",
            "List transfers made on your integration",
            dated(paged(InputSchema::new()))
                .field(FieldSpec::integer("customer").describe("Filter by customer ID")),
            Endpoint::get("/transfer"),
        ),
        ToolDescriptor::new(
            "transfer_fetch",
            "Get details of a transfer by ID or transfer code",
            InputSchema::new().field(
                FieldSpec::string("id_or_code")
                    .required()
                    .describe("Transfer ID or code (TRF_...)"),
            ),
            Endpoint::get("/transfer/{id_or_code}"),
        ),
        ToolDescriptor::new(
            "transfer_verify",
            "Verify the status of a transfer by reference",
            InputSchema::new().field(FieldSpec::string("reference").required()),
            Endpoint::get("/transfer/verify/{reference}"),
        ),
    ]
}
