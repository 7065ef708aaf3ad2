use crate::schema::{FieldSpec, InputSchema};
use crate::tools::handler::{Endpoint, ToolDescriptor};

use super::{dated, paged};

// Paystack returns balance `data` as one entry per currency. It is passed
// through as the array it is.
pub(super) fn tools() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "balance_check",
            "Check the available balance on your integration, per currency",
            InputSchema::new(),
            Endpoint::get("/balance"),
        ),
        ToolDescriptor::new(
            "balance_ledger",
            "Fetch all pay-ins and pay-outs that affected your balance",
            dated(paged(InputSchema::new())),
            Endpoint::get("/balance/ledger"),
        ),
        ToolDescriptor::new(
            "bank_list",
            "List supported banks",
            paged(InputSchema::new())
                .field(FieldSpec::string("country").default("nigeria").describe("nigeria, ghana, kenya or south africa"))
                .field(FieldSpec::string("currency"))
                .field(FieldSpec::string("type").describe("Financial channel, e.g. nuban, mobile_money")),
            Endpoint::get("/bank"),
        ),
        ToolDescriptor::new(
            "bank_resolve_account",
            "Confirm an account number belongs to the right customer",
            InputSchema::new()
                .field(FieldSpec::string("account_number").required())
                .field(FieldSpec::string("bank_code").required()),
            Endpoint::get("/bank/resolve"),
        ),
    ]
}
