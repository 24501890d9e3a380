//! Retrieval of remote page markup.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::address::PageAddress;
use crate::error::{Result, SeoLensError};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("seolens/", env!("CARGO_PKG_VERSION"));

/// Source of raw page markup.
#[cfg_attr(test, mockall::automock)]
pub trait PageFetcher {
    /// Fetch the markup served at `address`.
    fn fetch(&self, address: &PageAddress) -> Result<String>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for Box<T> {
    fn fetch(&self, address: &PageAddress) -> Result<String> {
        (**self).fetch(address)
    }
}

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` sent with each request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Fetcher backed by a blocking `reqwest` client.
///
/// The blocking client owns its own runtime, so it must be built outside of
/// any async context.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from settings.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, address: &PageAddress) -> Result<String> {
        let response = self.client.get(address.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeoLensError::Http(format!("{address} returned {status}")));
        }
        let body = response.text()?;
        if body.trim().is_empty() {
            return Err(SeoLensError::Http(format!("{address} returned an empty body")));
        }
        log::debug!("fetched {} bytes from {}", body.len(), address);
        Ok(body)
    }
}
