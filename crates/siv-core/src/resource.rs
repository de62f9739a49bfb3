//! Verification result
//!
//! A [`Resource`] is the immutable output of one pipeline run: the parsed
//! tag, the hostname verdict, the fetched bytes (or not), and the digests.
//! Failures along the way are recorded as state here instead of aborting,
//! so a caller scanning a whole page can tell "no SRI declared" from "SRI
//! declared but wrong" from "could not even fetch it".

use serde::Serialize;
use siv_html::TagFragment;

use crate::digest::{DigestSet, IntegrityDeclaration};
use crate::fetch::FetchError;

/// DNS verdict for the resource's source host.
///
/// The strict pre-fetch CNAME check and the fetch-success fact are kept as
/// separate observables. The original tooling collapsed them (a successful
/// fetch counted as a valid host no matter what the CNAME chain looked
/// like); here the caller gets both and picks its own policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostnameCheck {
    /// The pipeline has not looked at the host yet.
    Unchecked,
    /// No address records, or the source URL had no usable host.
    Unresolvable,
    /// The host resolved.
    Resolved {
        /// False if the CNAME chain hit a takeover-prone pattern.
        cname_trusted: bool,
        /// Whether the fetch that followed actually succeeded.
        fetched: bool,
    },
}

/// Terminal outcome of a verification run.
///
/// Three failure shapes are deliberately distinct: a batch caller reports
/// "lacks SRI protection" very differently from "SRI mismatch".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Declared integrity matched the fetched content.
    Verified,
    /// An integrity declaration was present but did not match.
    Mismatch,
    /// Content fetched, but the tag declares no (usable) integrity.
    NoDeclaration,
    /// Host resolved but the resource could not be retrieved.
    FetchFailed,
    /// Host did not resolve, either at the pre-fetch check (no fetch was
    /// attempted) or when re-checked after a failed fetch.
    HostUnresolvable,
}

/// One externally-referenced script resource and every fact the pipeline
/// established about it.
#[derive(Debug, Clone)]
pub struct Resource {
    pub(crate) source_url: String,
    pub(crate) original_tag: String,
    pub(crate) tag: TagFragment,
    pub(crate) hostname: HostnameCheck,
    pub(crate) content: Option<Vec<u8>>,
    pub(crate) fetch_error: Option<FetchError>,
    pub(crate) digests: DigestSet,
}

impl Resource {
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn original_tag(&self) -> &str {
        &self.original_tag
    }

    /// Attribute view over the referencing tag.
    pub fn tag(&self) -> &TagFragment {
        &self.tag
    }

    /// Whether the referenced content was actually retrieved.
    pub fn has_content(&self) -> bool {
        self.content.is_some()
    }

    pub fn content(&self) -> Option<&[u8]> {
        self.content.as_deref()
    }

    /// Why the fetch failed, if it did.
    pub fn fetch_error(&self) -> Option<&FetchError> {
        self.fetch_error.as_ref()
    }

    /// Digests of the fetched content. Empty whenever `has_content` is
    /// false.
    pub fn digests(&self) -> &DigestSet {
        &self.digests
    }

    pub fn hostname(&self) -> HostnameCheck {
        self.hostname
    }

    /// Lenient hostname verdict: did the host resolve at all. This matches
    /// the behavior SRI scanners historically shipped, where a retrievable
    /// resource implied a good-enough host.
    pub fn hostname_valid(&self) -> bool {
        matches!(self.hostname, HostnameCheck::Resolved { .. })
    }

    /// Strict hostname verdict: resolvable and no untrusted CNAME.
    pub fn hostname_strictly_valid(&self) -> bool {
        matches!(
            self.hostname,
            HostnameCheck::Resolved {
                cname_trusted: true,
                ..
            }
        )
    }

    /// Raw `integrity` attribute value, if the tag carries one.
    pub fn integrity_attribute(&self) -> Option<&str> {
        self.tag.attribute("integrity")
    }

    /// The declared `(algorithm, digest)` pair. Absent when the attribute is
    /// missing or has no hyphen to split on.
    pub fn declared_integrity(&self) -> Option<IntegrityDeclaration> {
        self.integrity_attribute().and_then(IntegrityDeclaration::parse)
    }

    /// True iff the declared integrity matches the computed digests. An
    /// absent declaration, a failed fetch, or an unknown algorithm all come
    /// back false.
    pub fn integrity_verified(&self) -> bool {
        match self.integrity_attribute() {
            Some(value) => self.digests.verify_declaration(value),
            None => false,
        }
    }

    pub fn outcome(&self) -> VerificationOutcome {
        match self.hostname {
            HostnameCheck::Unchecked | HostnameCheck::Unresolvable => {
                VerificationOutcome::HostUnresolvable
            }
            HostnameCheck::Resolved { .. } if self.content.is_none() => {
                VerificationOutcome::FetchFailed
            }
            HostnameCheck::Resolved { .. } => match self.declared_integrity() {
                None => VerificationOutcome::NoDeclaration,
                Some(_) if self.integrity_verified() => VerificationOutcome::Verified,
                Some(_) => VerificationOutcome::Mismatch,
            },
        }
    }

    /// Serializable summary for host tools that export findings.
    pub fn report(&self) -> VerificationReport {
        VerificationReport {
            source_url: self.source_url.clone(),
            outcome: self.outcome(),
            hostname_valid: self.hostname_valid(),
            hostname_strictly_valid: self.hostname_strictly_valid(),
            has_content: self.has_content(),
            declared_integrity: self.declared_integrity(),
            fetch_error: self.fetch_error.as_ref().map(|e| e.to_string()),
            digests: self.digests.clone(),
        }
    }
}

/// Flat, serializable view of a [`Resource`].
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub source_url: String,
    pub outcome: VerificationOutcome,
    pub hostname_valid: bool,
    pub hostname_strictly_valid: bool,
    pub has_content: bool,
    pub declared_integrity: Option<IntegrityDeclaration>,
    pub fetch_error: Option<String>,
    pub digests: DigestSet,
}
