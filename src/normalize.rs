use tracing::{debug, error, info, warn};

use crate::error::{ErrorKind, ToolError};
use crate::redaction::Redactor;
use crate::types::{ProviderResponse, ResultEnvelope};

/// Collapse an invocation outcome into the uniform envelope. Every tool goes
/// through here, so callers can branch on `success` alone.
pub fn into_envelope(
    tool: &str,
    result: Result<ProviderResponse, ToolError>,
    redactor: &Redactor,
) -> ResultEnvelope {
    match result {
        Ok(response) => {
            debug!(tool, message = %response.message, "tool call succeeded");
            ResultEnvelope::success(response)
        }
        Err(err) => {
            log_failure(tool, &err, redactor);
            ResultEnvelope::failure(redactor.redact(&err.public_message()), err.kind())
        }
    }
}

fn log_failure(tool: &str, err: &ToolError, redactor: &Redactor) {
    let detail = redactor.redact(&err.to_string());
    match err.kind() {
        ErrorKind::ValidationError => info!(tool, error = %detail, "rejected invalid parameters"),
        ErrorKind::UnknownTool => warn!(tool, "unknown tool requested"),
        ErrorKind::TransportError => warn!(tool, error = %detail, "could not reach Paystack"),
        ErrorKind::ProviderError => info!(tool, error = %detail, "Paystack returned an error"),
        ErrorKind::InternalError => {
            error!(tool, error = %detail, "internal error (details hidden from caller)")
        }
        ErrorKind::Cancelled => info!(tool, "invocation cancelled"),
    }
}
