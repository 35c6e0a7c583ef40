//! Raw and typed Mailgun responses.

use crate::Result;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// A fully-read HTTP response from Mailgun.
///
/// Successful calls return this as-is; [`Error::UnknownError`](crate::Error::UnknownError)
/// carries one for inspection when Mailgun answers with something unexpected.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ApiResponse {
    /// Assemble a response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Drain a `reqwest` response into an owned value.
    pub(crate) async fn read(response: reqwest::Response) -> Result<Self> {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();
        Ok(Self::new(status, headers, body))
    }

    /// HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON.
    ///
    /// A body that does not match `T` is reported as
    /// [`Error::EncodingProblem`](crate::Error::EncodingProblem); the status
    /// has already been classified by then.
    ///
    /// # Examples
    /// ```
    /// use mailgun_client::{ApiResponse, SendResponse};
    /// use reqwest::{StatusCode, header::HeaderMap};
    ///
    /// let response = ApiResponse::new(
    ///     StatusCode::OK,
    ///     HeaderMap::new(),
    ///     br#"{"id":"<20240101.1@example.com>","message":"Queued. Thank you."}"#.to_vec(),
    /// );
    /// let sent: SendResponse = response.json()?;
    /// assert_eq!(sent.message, "Queued. Thank you.");
    /// # Ok::<(), mailgun_client::Error>(())
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }
}

/// Body Mailgun returns when a message is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SendResponse {
    /// Message id assigned by Mailgun, angle brackets included.
    pub id: String,
    pub message: String,
}

/// Body Mailgun returns when a route is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteResponse {
    pub message: String,
    pub route: CreatedRoute,
}

/// The route as stored by Mailgun.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedRoute {
    pub id: String,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub description: String,
    pub expression: String,
    #[serde(default)]
    pub actions: Vec<String>,
}
