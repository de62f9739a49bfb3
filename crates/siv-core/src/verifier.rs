//! Verification pipeline
//!
//! Strictly sequential per resource: parse the tag, check the host, fetch,
//! digest. Each run is independent, so one verifier can be shared across
//! parallel workers with one task per tag.

use siv_html::TagFragment;
use url::Url;

use crate::digest::DigestSet;
use crate::dns::HostnameValidator;
use crate::fetch::{FetchError, ResourceFetcher};
use crate::resource::{HostnameCheck, Resource};

const DEFAULT_TAG_NAME: &str = "script";

/// Runs the SRI verification pipeline over (source URL, raw tag) pairs.
pub struct ResourceVerifier<'a> {
    fetcher: &'a dyn ResourceFetcher,
    hostnames: &'a dyn HostnameValidator,
    tag_name: String,
}

impl<'a> ResourceVerifier<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher, hostnames: &'a dyn HostnameValidator) -> Self {
        Self {
            fetcher,
            hostnames,
            tag_name: DEFAULT_TAG_NAME.to_string(),
        }
    }

    /// Verify a resource referenced by a different element kind, e.g.
    /// `"link"` for stylesheets.
    pub fn with_tag_name(mut self, tag_name: &str) -> Self {
        self.tag_name = tag_name.to_string();
        self
    }

    /// Run the full pipeline for one resource.
    ///
    /// Never fails outright: hostname problems, fetch failures and missing
    /// or malformed declarations are all recorded on the returned
    /// [`Resource`].
    pub fn verify(&self, source_url: &str, raw_tag: &str) -> Resource {
        tracing::debug!(source_url, "verifying resource");
        let tag = TagFragment::parse(raw_tag, &self.tag_name);

        let (hostname, content, fetch_error) = match host_of(source_url) {
            None => {
                tracing::warn!(source_url, "source URL has no usable host");
                (HostnameCheck::Unresolvable, None, None)
            }
            Some(host) => self.check_and_fetch(source_url, &host),
        };

        let digests = match &content {
            Some(bytes) => DigestSet::compute(bytes),
            None => DigestSet::default(),
        };

        Resource {
            source_url: source_url.to_string(),
            original_tag: raw_tag.to_string(),
            tag,
            hostname,
            content,
            fetch_error,
            digests,
        }
    }

    /// Host check then fetch. The fetch is only attempted once the host is
    /// known to resolve; the CNAME verdict is taken before the fetch so it
    /// cannot be masked by a successful retrieval.
    fn check_and_fetch(
        &self,
        source_url: &str,
        host: &str,
    ) -> (HostnameCheck, Option<Vec<u8>>, Option<FetchError>) {
        if !self.hostnames.is_resolvable(host) {
            tracing::warn!(source_url, host, "hostname did not resolve; skipping fetch");
            return (HostnameCheck::Unresolvable, None, None);
        }

        let cname_trusted = !self.hostnames.has_untrusted_cname(host);
        if !cname_trusted {
            tracing::warn!(source_url, host, "untrusted CNAME in resolution chain");
        }

        match self.fetcher.fetch(source_url) {
            Ok(body) => {
                tracing::debug!(source_url, bytes = body.bytes().len(), "resource fetched");
                (
                    HostnameCheck::Resolved {
                        cname_trusted,
                        fetched: true,
                    },
                    Some(body.into_bytes()),
                    None,
                )
            }
            Err(err) => {
                tracing::warn!(source_url, error = %err, "failed to fetch resource");
                // Re-derive resolvability: the host may have stopped
                // answering between the pre-check and the fetch.
                let hostname = if self.hostnames.is_resolvable(host) {
                    HostnameCheck::Resolved {
                        cname_trusted,
                        fetched: false,
                    }
                } else {
                    HostnameCheck::Unresolvable
                };
                (hostname, None, Some(err))
            }
        }
    }
}

fn host_of(source_url: &str) -> Option<String> {
    let url = Url::parse(source_url).ok()?;
    url.host_str().map(str::to_owned)
}
