//! Error types for Mailgun operations.

use crate::ApiResponse;
use serde::Deserialize;

/// Errors that can occur while talking to the Mailgun API.
///
/// Every variant has a stable [`identifier`](Error::identifier) so callers can
/// branch or log on the kind without matching on display text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API key or a request payload could not be encoded.
    #[error("encoding problem: {0}")]
    EncodingProblem(String),

    /// Mailgun rejected the credentials (HTTP 401).
    #[error("authentication failed: check the API key")]
    AuthenticationFailed,

    /// Mailgun refused the request and explained why.
    #[error("unable to send email: {0}")]
    UnableToSendEmail(String),

    /// Mailgun returned a non-200 response with an unrecognized body.
    #[error("unknown error (HTTP {})", .0.status())]
    UnknownError(Box<ApiResponse>),

    /// Transport-level failure (connect, TLS, timeout, body read).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Missing or invalid client configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Stable machine-readable identifier for this error kind.
    pub fn identifier(&self) -> &'static str {
        match self {
            Error::EncodingProblem(_) => "encoding_problem",
            Error::AuthenticationFailed => "authentication_failed",
            Error::UnableToSendEmail(_) => "unable_to_send_email",
            Error::UnknownError(_) => "unknown_error",
            Error::Request(_) => "request_failed",
            Error::Config(_) => "invalid_config",
        }
    }

    /// The raw response, for [`Error::UnknownError`].
    pub fn response(&self) -> Option<&ApiResponse> {
        match self {
            Error::UnknownError(response) => Some(response),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::EncodingProblem(err.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(err: reqwest::header::InvalidHeaderValue) -> Self {
        Error::EncodingProblem(err.to_string())
    }
}

/// Error body returned by Mailgun on failed requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason supplied by Mailgun.
    pub message: String,
}
