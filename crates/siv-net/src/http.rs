//! HTTP fetcher
//!
//! Blocking reqwest client behind the [`ResourceFetcher`] trait. One client
//! is built up front and reused; per-request failures map onto
//! [`FetchError`] so the pipeline records them instead of bailing.

use std::time::Duration;

use siv_core::{FetchError, FetchedBody, ResourceFetcher};

const DEFAULT_USER_AGENT: &str = "siv-engine/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches resources over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }

    /// Build a fetcher with an explicit user agent and request timeout.
    /// The timeout bounds the whole request; the pipeline itself imposes
    /// none.
    pub fn with_config(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        tracing::debug!(url, "fetching resource");

        let response = self.client.get(url).send().map_err(|e| {
            if e.is_builder() {
                FetchError::InvalidUrl(url.to_string())
            } else {
                FetchError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            tracing::warn!(url, status, "non-success response");
            return Err(FetchError::Http { status });
        }

        let bytes = response
            .bytes()
            .map_err(|e| FetchError::Network(e.to_string()))?
            .to_vec();

        tracing::debug!(url, bytes = bytes.len(), "resource retrieved");
        Ok(FetchedBody::new(bytes))
    }
}
