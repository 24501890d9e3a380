//! Error types for SeoLens core.

use std::{error::Error, fmt, io};

/// Error type for SeoLens core operations.
#[derive(Debug)]
pub enum SeoLensError {
    /// An underlying I/O error.
    Io(io::Error),
    /// A JSON encoding or decoding error.
    Json(serde_json::Error),
    /// The page could not be retrieved.
    Http(String),
    /// The address is not an absolute `http`/`https` URL with a host.
    InvalidAddress(String),
    /// A catch-all error with a message.
    Other(String),
}

impl fmt::Display for SeoLensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Http(message) => write!(f, "fetch failed: {message}"),
            Self::InvalidAddress(address) => write!(f, "invalid address: {address}"),
            Self::Other(message) => write!(f, "{message}"),
        }
    }
}

impl Error for SeoLensError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for SeoLensError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for SeoLensError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<reqwest::Error> for SeoLensError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value.to_string())
    }
}

/// Convenience result type for SeoLens core.
pub type Result<T> = std::result::Result<T, SeoLensError>;
