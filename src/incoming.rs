//! Payload Mailgun posts to a `forward()` route target.

use crate::Result;
use serde::Deserialize;

/// An inbound message as delivered by a forwarding route.
///
/// Deserialize it from the form body with whatever extractor the host
/// framework provides. Webhook signatures are carried but not verified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    pub recipient: String,
    pub sender: String,
    pub from: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "body-plain", default)]
    pub body_plain: String,
    #[serde(rename = "stripped-text", default)]
    pub stripped_text: String,
    #[serde(rename = "stripped-signature", default)]
    pub stripped_signature: Option<String>,
    #[serde(rename = "body-html", default)]
    pub body_html: Option<String>,
    #[serde(rename = "stripped-html", default)]
    pub stripped_html: Option<String>,
    /// JSON text: a list of `[name, value]` pairs.
    #[serde(rename = "message-headers", default)]
    pub message_headers: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub signature: String,
}

impl IncomingMessage {
    /// Decode `message-headers` into name/value pairs, in original order.
    pub fn headers(&self) -> Result<Vec<(String, String)>> {
        if self.message_headers.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&self.message_headers).map_err(Into::into)
    }
}
