//! Validated page addresses.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, SeoLensError};

/// An absolute `http`/`https` address with a non-empty host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageAddress {
    url: Url,
}

impl PageAddress {
    /// Parse and validate a user-supplied address.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let url =
            Url::parse(trimmed).map_err(|_| SeoLensError::InvalidAddress(trimmed.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SeoLensError::InvalidAddress(trimmed.to_string()));
        }
        match url.host_str() {
            Some(host) if !host.is_empty() => Ok(Self { url }),
            _ => Err(SeoLensError::InvalidAddress(trimmed.to_string())),
        }
    }

    /// The full address.
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The host component, used as the report domain.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Whether the address uses the `https` scheme.
    pub fn is_https(&self) -> bool {
        self.url.scheme() == "https"
    }

    /// The parsed URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for PageAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for PageAddress {
    type Error = SeoLensError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PageAddress> for String {
    fn from(value: PageAddress) -> Self {
        value.url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::PageAddress;

    #[test]
    fn accepts_http_and_https() {
        let secure = PageAddress::parse(" https://example.com/page ").expect("https");
        assert!(secure.is_https());
        assert_eq!(secure.host(), "example.com");

        let plain = PageAddress::parse("http://example.org").expect("http");
        assert!(!plain.is_https());
        assert_eq!(plain.as_str(), "http://example.org/");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(PageAddress::parse("ftp://example.com").is_err());
        assert!(PageAddress::parse("mailto:someone@example.com").is_err());
        assert!(PageAddress::parse("example.com").is_err());
        assert!(PageAddress::parse("").is_err());
    }

    #[test]
    fn deserializes_through_validation() {
        let parsed: PageAddress = serde_json::from_str("\"https://example.com\"").expect("valid");
        assert_eq!(parsed.host(), "example.com");
        assert!(serde_json::from_str::<PageAddress>("\"file:///etc/passwd\"").is_err());
    }
}
