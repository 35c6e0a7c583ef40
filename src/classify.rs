//! Mapping of Mailgun responses onto [`Error`] kinds.

use crate::{ApiResponse, Error, ErrorResponse, Result};
use reqwest::StatusCode;

/// Classify a Mailgun response.
///
/// | Status | Outcome |
/// |---|---|
/// | 200 | `Ok(response)` |
/// | 401 | [`Error::AuthenticationFailed`] |
/// | other, body is `{"message": ...}` | [`Error::UnableToSendEmail`] |
/// | other | [`Error::UnknownError`] carrying the response |
///
/// Nothing is retried here; the caller decides.
pub fn classify(response: ApiResponse) -> Result<ApiResponse> {
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::UNAUTHORIZED => Err(Error::AuthenticationFailed),
        status => match serde_json::from_slice::<ErrorResponse>(response.body()) {
            Ok(body) => {
                tracing::debug!(%status, reason = %body.message, "mailgun rejected request");
                Err(Error::UnableToSendEmail(body.message))
            }
            Err(_) => {
                tracing::debug!(%status, "mailgun returned unrecognized error body");
                Err(Error::UnknownError(Box::new(response)))
            }
        },
    }
}
