//! Transport-independent response handling.
//!
//! Each HTTP transport reads status and body itself, then hands both here so
//! success/failure classification and decoding stay identical across the
//! browser and the CLI.

#[cfg(test)]
#[path = "response_test.rs"]
mod response_test;

use serde::de::DeserializeOwned;

use crate::error::ApiError;

#[must_use]
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Decode a JSON body, or classify the failure.
///
/// # Errors
///
/// Returns the classified error for non-2xx statuses and
/// [`ApiError::Decode`] when the body does not match `T`.
pub fn decode_json<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    expect_success(status, body)?;
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Accept any 2xx response and ignore its body.
///
/// # Errors
///
/// Returns the classified error for non-2xx statuses.
pub fn expect_success(status: u16, body: &str) -> Result<(), ApiError> {
    if is_success(status) { Ok(()) } else { Err(ApiError::from_response(status, body)) }
}
