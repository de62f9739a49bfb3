//! Resource fetching contract
//!
//! The pipeline never talks to the network itself; it goes through a
//! [`ResourceFetcher`]. Production code injects the HTTP implementation from
//! `siv-net`, tests inject fakes.

use std::borrow::Cow;

/// Fetch failure.
///
/// Non-fatal to a verification batch: the owning resource ends up
/// content-less and digest-less, and the caller reads that off the result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// A successfully fetched resource body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedBody {
    bytes: Vec<u8>,
}

impl FetchedBody {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Text view of the body. Script bodies are usually UTF-8; anything that
    /// is not gets replacement characters rather than an error.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

/// Retrieves resource bytes for a URL.
///
/// On failure the resource must be left in the "no data" state, never with a
/// partial buffer, so implementations return the whole body or an error.
/// Timeouts are the implementation's responsibility; the pipeline assumes a
/// fetch eventually returns.
pub trait ResourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError>;
}
