//! siv Core
//!
//! Subresource Integrity (SRI) verification for externally-referenced script
//! resources.
//!
//! Given the raw tag that referenced a resource and its source URL, the
//! pipeline checks that the hostname resolves, fetches the content, computes
//! digests under the full SRI algorithm set, and compares them against the
//! tag's `integrity` attribute. The result is a [`Resource`]: a bundle of
//! facts (hash values, match/no-match, hostname validity) for the caller to
//! apply policy to.
//!
//! Network and DNS are behind the [`ResourceFetcher`] and
//! [`HostnameValidator`] traits so hosts can substitute their own transport
//! (production implementations live in `siv-net`).

pub mod digest;
pub mod dns;
pub mod fetch;
pub mod resource;
pub mod verifier;

pub use digest::{DigestAlgorithm, DigestSet, IntegrityDeclaration};
pub use dns::HostnameValidator;
pub use fetch::{FetchError, FetchedBody, ResourceFetcher};
pub use resource::{HostnameCheck, Resource, VerificationOutcome, VerificationReport};
pub use verifier::ResourceVerifier;
