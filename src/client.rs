//! Mailgun async client implementation.

use crate::form::{FormEncode, to_multipart};
use crate::{ApiResponse, Config, Error, Message, Region, Result, RouteSetup, classify};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use std::time::Duration;

/// The operations a Mailgun-backed mail provider offers.
///
/// [`Client`] is the real implementation; hosts can substitute their own for
/// tests or alternative transports.
#[async_trait]
pub trait MailgunProvider: Send + Sync {
    /// The API key used for Basic auth.
    fn api_key(&self) -> &str;

    /// The sending domain messages are posted under.
    fn domain(&self) -> &str;

    /// Send one message.
    async fn send(&self, message: &Message) -> Result<ApiResponse>;

    /// Create an inbound route.
    async fn setup_forwarding(&self, setup: &RouteSetup) -> Result<ApiResponse>;
}

/// Async client for the Mailgun HTTP API.
///
/// Use [`Client::new`] for defaults or [`Client::builder`] for custom settings
/// like region, timeouts and proxies.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
    domain: String,
    base_url: String,
    proxy: Option<String>,
}

impl Client {
    /// Create a builder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the US region.
    ///
    /// # Examples
    /// ```
    /// # use mailgun_client::Client;
    /// let client = Client::new("key-3ax6xnjp29jd6fds4gc373sgvjxteol0", "mg.example.com")?;
    /// assert_eq!(client.domain(), "mg.example.com");
    /// # Ok::<(), mailgun_client::Error>(())
    /// ```
    pub fn new(api_key: impl Into<String>, domain: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).domain(domain).build()
    }

    /// Create a client from `MAILGUN_*` environment variables.
    ///
    /// See [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        ClientBuilder::from_config(Config::from_env()?).build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Get the proxy URL if one was configured.
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Send a message.
    ///
    /// Messages carrying recipient variables go out as a batch send; everything
    /// else is posted as `multipart/form-data`.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_client::{Client, Message};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_client::Error> {
    /// let client = Client::from_env()?;
    /// let message = Message::new("noreply@mg.example.com", "user@example.com", "Hello")
    ///     .with_text("Hi there");
    /// client.send(&message).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn send(&self, message: &Message) -> Result<ApiResponse> {
        if message.is_batch() {
            return self.send_batch(message).await;
        }

        let url = self.messages_url();
        tracing::debug!(endpoint = %url, batch = false, "sending message");

        let request = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .multipart(to_multipart(message)?);
        Self::execute(request).await
    }

    /// Create an inbound route. Routes are account-wide, so the configured
    /// domain plays no part in the URL.
    ///
    /// # Examples
    /// ```no_run
    /// # use mailgun_client::{Client, RouteSetup};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), mailgun_client::Error> {
    /// let client = Client::from_env()?;
    /// let route = RouteSetup::forward_all("https://example.com/inbound", "inbound mail");
    /// client.setup_forwarding(&route).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn setup_forwarding(&self, setup: &RouteSetup) -> Result<ApiResponse> {
        let url = self.routes_url();
        tracing::debug!(endpoint = %url, expression = setup.expression(), "creating route");

        let request = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .multipart(to_multipart(setup)?);
        Self::execute(request).await
    }

    /// Batch send: JSON body plus the same fields in the query string, on a GET.
    ///
    /// Mailgun reads `recipient-variables` from this shape; files have no
    /// place in it, so a message carrying any is refused before sending.
    async fn send_batch(&self, message: &Message) -> Result<ApiResponse> {
        let files = message.attachments().len() + message.inline().len();
        if files > 0 {
            return Err(Error::EncodingProblem(format!(
                "batch sends cannot carry files ({files} attached)"
            )));
        }

        let url = self.messages_url();
        tracing::debug!(endpoint = %url, batch = true, "sending message");

        let request = self
            .http
            .get(&url)
            .headers(self.headers()?)
            .query(&message.fields()?)
            .json(&message.json_body()?);
        Self::execute(request).await
    }

    /// Send a request, drain the body and classify the outcome.
    async fn execute(request: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let response = request.send().await?;
        classify(ApiResponse::read(response).await?)
    }

    fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.base_url, self.domain)
    }

    fn routes_url(&self) -> String {
        format!("{}/v3/routes", self.base_url)
    }

    /// Build headers for API requests.
    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, basic_auth(&self.api_key)?);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .field("proxy", &self.proxy)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MailgunProvider for Client {
    fn api_key(&self) -> &str {
        Client::api_key(self)
    }

    fn domain(&self) -> &str {
        Client::domain(self)
    }

    async fn send(&self, message: &Message) -> Result<ApiResponse> {
        Client::send(self, message).await
    }

    async fn setup_forwarding(&self, setup: &RouteSetup) -> Result<ApiResponse> {
        Client::setup_forwarding(self, setup).await
    }
}

/// `Basic base64("api:" + api_key)`, marked sensitive.
pub(crate) fn basic_auth(api_key: &str) -> Result<HeaderValue> {
    let encoded = STANDARD.encode(format!("api:{api_key}"));
    let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
        .map_err(|e| Error::EncodingProblem(format!("authorization header: {e}")))?;
    value.set_sensitive(true);
    Ok(value)
}

const USER_AGENT_VALUE: &str = concat!("mailgun-client/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a Mailgun client.
///
/// Start with [`Client::builder`] to override defaults.
#[derive(Clone)]
pub struct ClientBuilder {
    api_key: Option<String>,
    domain: Option<String>,
    region: Region,
    base_url: Option<String>,
    timeout: Option<Duration>,
    proxy: Option<String>,
    danger_accept_invalid_certs: bool,
    user_agent: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    ///
    /// Defaults:
    /// - US region
    /// - No proxy, no timeout beyond reqwest's own
    /// - `danger_accept_invalid_certs = false`
    /// - `mailgun-client/<version>` user agent
    pub fn new() -> Self {
        Self {
            api_key: None,
            domain: None,
            region: Region::default(),
            base_url: None,
            timeout: None,
            proxy: None,
            danger_accept_invalid_certs: false,
            user_agent: USER_AGENT_VALUE.to_string(),
        }
    }

    /// Seed a builder from a [`Config`].
    pub fn from_config(config: Config) -> Self {
        let builder = Self::new()
            .api_key(config.api_key)
            .domain(config.domain)
            .region(config.region);
        match config.base_url {
            Some(base_url) => builder.base_url(base_url),
            None => builder,
        }
    }

    /// Mailgun private API key, conventionally starting with `key-`.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sending domain, e.g. `mg.example.com`.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    /// Override the API base URL.
    ///
    /// Useful for testing or when routing through a gateway. Takes precedence
    /// over [`region`](Self::region).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Total request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a proxy URL (e.g., "http://127.0.0.1:8080").
    ///
    /// This uses reqwest's proxy support for all requests.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Control whether to accept invalid TLS certificates (default: false).
    pub fn danger_accept_invalid_certs(mut self, value: bool) -> Self {
        self.danger_accept_invalid_certs = value;
        self
    }

    /// Override the default user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Build the client. No network traffic happens here.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .ok_or_else(|| Error::Config("api key is required".to_string()))?;
        let domain = self
            .domain
            .ok_or_else(|| Error::Config("domain is required".to_string()))?;

        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.danger_accept_invalid_certs)
            .user_agent(self.user_agent);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(proxy_url) = &self.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| self.region.base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Client {
            http: builder.build()?,
            api_key,
            domain,
            base_url,
            proxy: self.proxy,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("domain", &self.domain)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("proxy", &self.proxy)
            .field("danger_accept_invalid_certs", &self.danger_accept_invalid_certs)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_is_byte_exact() {
        let value = basic_auth("key-3ax6xnjp29jd6fds4gc373sgvjxteol0").unwrap();
        // base64("api:key-3ax6xnjp29jd6fds4gc373sgvjxteol0")
        assert_eq!(
            value.to_str().unwrap(),
            "Basic YXBpOmtleS0zYXg2eG5qcDI5amQ2ZmRzNGdjMzczc2d2anh0ZW9sMA=="
        );
        assert!(value.is_sensitive());
    }

    #[test]
    fn invalid_header_value_converts_to_encoding_problem() {
        let err: Error = HeaderValue::from_str("bad\nvalue").unwrap_err().into();
        assert_eq!(err.identifier(), "encoding_problem");
    }

    #[test]
    fn basic_auth_encodes_any_key() {
        // base64 output is header-safe even for keys with control characters
        let value = basic_auth("key-\n\u{7f}\u{e9}").unwrap();
        let encoded = value.to_str().unwrap().strip_prefix("Basic ").unwrap();
        assert_eq!(STANDARD.decode(encoded).unwrap(), "api:key-\n\u{7f}\u{e9}".as_bytes());
    }

    #[test]
    fn urls_follow_region_and_override() {
        let us = Client::new("key-1", "mg.example.com").unwrap();
        assert_eq!(us.messages_url(), "https://api.mailgun.net/v3/mg.example.com/messages");
        assert_eq!(us.routes_url(), "https://api.mailgun.net/v3/routes");

        let eu = Client::builder()
            .api_key("key-1")
            .domain("mg.example.eu")
            .region(Region::Eu)
            .build()
            .unwrap();
        assert_eq!(eu.messages_url(), "https://api.eu.mailgun.net/v3/mg.example.eu/messages");

        let local = Client::builder()
            .api_key("key-1")
            .domain("mg.example.com")
            .base_url("http://127.0.0.1:9000/")
            .build()
            .unwrap();
        assert_eq!(local.routes_url(), "http://127.0.0.1:9000/v3/routes");
    }

    #[test]
    fn builder_requires_credentials() {
        let err = Client::builder().domain("mg.example.com").build().unwrap_err();
        assert_eq!(err.identifier(), "invalid_config");

        let err = Client::builder().api_key("key-1").build().unwrap_err();
        assert_eq!(err.identifier(), "invalid_config");
    }

    #[test]
    fn from_config_applies_override() {
        let config = Config {
            api_key: "key-1".into(),
            domain: "mg.example.com".into(),
            region: Region::Eu,
            base_url: Some("http://localhost:1234".into()),
        };
        let client = ClientBuilder::from_config(config).build().unwrap();
        assert_eq!(client.messages_url(), "http://localhost:1234/v3/mg.example.com/messages");
    }

    #[test]
    fn debug_omits_api_key() {
        let client = Client::new("key-very-secret", "mg.example.com").unwrap();
        assert!(!format!("{client:?}").contains("key-very-secret"));
    }
}
