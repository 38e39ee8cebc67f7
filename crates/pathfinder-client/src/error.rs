//! Mapping of HTTP failures onto `ApiError`.

pub use pathfinder_core::error::ApiError;

/// Classify a reqwest failure that happened before a usable response.
pub(crate) fn from_transport(err: reqwest::Error, timeout_secs: u64) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout(timeout_secs)
    } else if err.is_decode() {
        ApiError::Decode(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

/// Build the error for a non-success response.
///
/// The back end reports failures as `{"error": "..."}`; that message is
/// used when present, otherwise the raw body.
pub(crate) fn from_status(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    ApiError::HttpStatus { status, message }
}
