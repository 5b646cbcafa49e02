//! Turns failed HyperSender HTTP exchanges into [`SendError`] values.

use reqwest::StatusCode;
use serde_json::Value;

use crate::errors::SendError;

const NO_REASONS: &str = "No reasons given";

/// Classify an HTTP error response.
///
/// `body` is `None` when the response carried no body at all. `cause` is the
/// original transport error and is kept as the error source.
#[must_use]
pub fn classify_error_response(
    status: StatusCode,
    body: Option<&str>,
    cause: Option<reqwest::Error>,
) -> SendError {
    let reason = status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_string();

    let Some(body) = body else {
        return SendError::BackendError {
            status: status.as_u16(),
            reason,
            reasons: Vec::new(),
            message: "HyperSender responded with an error but no response body found".to_string(),
            source: cause,
        };
    };

    let reasons = extract_reasons(body);
    let joined = if reasons.is_empty() {
        NO_REASONS.to_string()
    } else {
        reasons.join(" ")
    };

    SendError::BackendError {
        status: status.as_u16(),
        message: format!(
            "HyperSender responded with an error `{} - {} - {}`",
            status.as_u16(),
            reason,
            joined
        ),
        reason,
        reasons,
        source: cause,
    }
}

/// Collect `errors.<field>[]` strings followed by `message`.
///
/// Bodies that are not JSON objects yield no reasons.
#[must_use]
pub fn extract_reasons(body: &str) -> Vec<String> {
    let Ok(Value::Object(parsed)) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };

    let mut reasons: Vec<String> = parsed
        .get("errors")
        .and_then(Value::as_object)
        .map(|fields| {
            fields
                .values()
                .filter_map(Value::as_array)
                .flatten()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if let Some(message) = parsed.get("message").and_then(Value::as_str) {
        reasons.push(message.to_string());
    }

    reasons
}
