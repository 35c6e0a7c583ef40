//! # Mailgun Client
//! Asynchronous wrapper around the Mailgun HTTP API: send messages, run templated batch sends with per-recipient variables, and configure inbound forwarding routes from Rust using [`Client`] and [`ClientBuilder`].
//!
//! ## Audience and uses
//! For Rust services that deliver transactional mail through Mailgun: build a [`Message`], hand it to [`Client::send`], and get back the raw [`ApiResponse`] or a typed [`Error`]. Inbound mail can be routed to your own endpoint with [`RouteSetup`] and decoded there as an [`IncomingMessage`].
//!
//! ## Runtime requirements
//! Async-only; run inside a Tokio (v1) runtime. HTTP calls use `reqwest`; timeouts, proxies and TLS come from its configuration via [`ClientBuilder`].
//!
//! ## Out of scope
//! No retries, queuing or rate limiting. Each call is exactly one HTTP request and the caller decides what to do with a failure. Addresses are not validated; Mailgun is authoritative.
//!
//! ## Errors
//! A 401 becomes [`Error::AuthenticationFailed`]; other non-200 statuses become [`Error::UnableToSendEmail`] when Mailgun explains itself and [`Error::UnknownError`] otherwise. Transport failures surface as [`Error::Request`]. The crate-wide [`Result`] alias wraps these errors.
//!
//! ## Example
//! ```no_run
//! use mailgun_client::{Client, Message, SendResponse};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mailgun_client::Error> {
//!     let client = Client::new("key-3ax6xnjp29jd6fds4gc373sgvjxteol0", "mg.example.com")?;
//!
//!     let message = Message::new(
//!         "Example <noreply@mg.example.com>",
//!         vec![("alice@example.com".to_string(), Some("Alice".to_string()))],
//!         "Your receipt",
//!     )
//!     .with_text("Thanks for your order.");
//!
//!     let sent: SendResponse = client.send(&message).await?.json()?;
//!     println!("Queued as {}", sent.id);
//!     Ok(())
//! }
//! ```

mod classify;
mod client;
mod config;
mod error;
mod form;
mod incoming;
mod message;
mod response;
mod route;

pub use classify::classify;
pub use client::{Client, ClientBuilder, MailgunProvider};
pub use config::{Config, Region};
pub use error::{Error, ErrorResponse};
pub use incoming::IncomingMessage;
pub use message::{Attachment, FullEmail, Message, RecipientVariables, Recipients};
pub use response::{ApiResponse, CreatedRoute, RouteResponse, SendResponse};
pub use route::RouteSetup;

/// Result type alias for Mailgun operations.
///
/// This is equivalent to `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
