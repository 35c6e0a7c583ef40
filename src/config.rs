//! Environment-driven client configuration.

use crate::{Error, Result};
use std::env;
use std::str::FromStr;

/// Mailgun API region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Region {
    #[default]
    Us,
    Eu,
}

impl Region {
    /// Base URL of the API for this region.
    pub fn base_url(self) -> &'static str {
        match self {
            Region::Us => "https://api.mailgun.net",
            Region::Eu => "https://api.eu.mailgun.net",
        }
    }
}

impl FromStr for Region {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(Region::Us),
            "eu" => Ok(Region::Eu),
            other => Err(Error::Config(format!("unknown region `{other}`"))),
        }
    }
}

/// Credentials and endpoint settings for a [`Client`](crate::Client).
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub domain: String,
    pub region: Region,
    pub base_url: Option<String>,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `MAILGUN_API_KEY` (required)
    /// - `MAILGUN_DOMAIN` (required)
    /// - `MAILGUN_REGION`: `us` or `eu`, defaults to `us`
    /// - `MAILGUN_BASE_URL`: overrides the regional endpoint
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
        };

        let region = match lookup("MAILGUN_REGION") {
            Some(value) if !value.is_empty() => value.parse()?,
            _ => Region::default(),
        };

        Ok(Config {
            api_key: required("MAILGUN_API_KEY")?,
            domain: required("MAILGUN_DOMAIN")?,
            region,
            base_url: lookup("MAILGUN_BASE_URL").filter(|v| !v.is_empty()),
        })
    }
}

// Keep the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("domain", &self.domain)
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .finish()
    }
}
