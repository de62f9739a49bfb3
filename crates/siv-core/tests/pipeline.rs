//! End-to-end pipeline tests for siv-core
//!
//! Drives the verifier with fake fetcher/DNS collaborators, no network.

use std::sync::atomic::{AtomicUsize, Ordering};

use siv_core::{
    DigestAlgorithm, FetchError, FetchedBody, HostnameCheck, HostnameValidator, Resource,
    ResourceFetcher, ResourceVerifier, VerificationOutcome,
};

const BODY: &[u8] = b"console.log('hello');";
const BODY_SHA256: &str = "uYeF7eHzVgKpiBg5fikv2NTctmJnxCfX1UhhlrizvNE=";
const BODY_MD5: &str = "1AOuuBRfEJa4lYugCC6URg==";
const SRC: &str = "https://cdn.example.com/app.js";

/// Serves a fixed body and counts how often it was asked.
struct StaticFetcher {
    body: Vec<u8>,
    calls: AtomicUsize,
}

impl StaticFetcher {
    fn new(body: &[u8]) -> Self {
        Self {
            body: body.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResourceFetcher for StaticFetcher {
    fn fetch(&self, _url: &str) -> Result<FetchedBody, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchedBody::new(self.body.clone()))
    }
}

struct FailingFetcher;

impl ResourceFetcher for FailingFetcher {
    fn fetch(&self, url: &str) -> Result<FetchedBody, FetchError> {
        let _ = url;
        Err(FetchError::Network("connection refused".into()))
    }
}

struct FakeDns {
    resolvable: bool,
    untrusted_cname: bool,
}

impl FakeDns {
    fn good() -> Self {
        Self {
            resolvable: true,
            untrusted_cname: false,
        }
    }
}

impl HostnameValidator for FakeDns {
    fn is_resolvable(&self, _host: &str) -> bool {
        self.resolvable
    }

    fn has_untrusted_cname(&self, _host: &str) -> bool {
        self.untrusted_cname
    }
}

/// Resolves on the first query and never again, like a host whose record
/// disappears mid-pipeline.
struct VanishingDns {
    queries: AtomicUsize,
}

impl VanishingDns {
    fn new() -> Self {
        Self {
            queries: AtomicUsize::new(0),
        }
    }
}

impl HostnameValidator for VanishingDns {
    fn is_resolvable(&self, _host: &str) -> bool {
        self.queries.fetch_add(1, Ordering::SeqCst) == 0
    }

    fn has_untrusted_cname(&self, _host: &str) -> bool {
        false
    }
}

fn tag_with_integrity(value: &str) -> String {
    format!(r#"<script src="{SRC}" integrity="{value}"></script>"#)
}

fn verify(fetcher: &dyn ResourceFetcher, dns: &dyn HostnameValidator, tag: &str) -> Resource {
    ResourceVerifier::new(fetcher, dns).verify(SRC, tag)
}

#[test]
fn matching_sha256_declaration_verifies() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    assert!(resource.integrity_verified());
    assert!(resource.has_content());
    assert!(resource.hostname_valid());
    assert_eq!(resource.outcome(), VerificationOutcome::Verified);
    assert_eq!(resource.content(), Some(BODY));
}

#[test]
fn mismatched_digest_is_reported_not_fatal() {
    let fetcher = StaticFetcher::new(b"tampered content");
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    assert!(!resource.integrity_verified());
    assert!(resource.has_content());
    assert_eq!(resource.outcome(), VerificationOutcome::Mismatch);
}

#[test]
fn missing_integrity_attribute_is_no_declaration() {
    let fetcher = StaticFetcher::new(BODY);
    let tag = format!(r#"<script src="{SRC}"></script>"#);
    let resource = verify(&fetcher, &FakeDns::good(), &tag);

    assert_eq!(resource.declared_integrity(), None);
    assert!(!resource.integrity_verified());
    assert!(resource.has_content());
    assert_eq!(resource.outcome(), VerificationOutcome::NoDeclaration);
}

#[test]
fn unresolvable_host_never_fetches() {
    let fetcher = StaticFetcher::new(BODY);
    let dns = FakeDns {
        resolvable: false,
        untrusted_cname: false,
    };
    let resource = verify(&fetcher, &dns, &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    assert_eq!(fetcher.call_count(), 0);
    assert!(!resource.hostname_valid());
    assert!(!resource.has_content());
    assert!(resource.digests().is_empty());
    assert_eq!(resource.outcome(), VerificationOutcome::HostUnresolvable);
}

#[test]
fn md5_declaration_is_supported() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity(&format!("md5-{BODY_MD5}")));

    assert!(resource.integrity_verified());
    assert_eq!(resource.outcome(), VerificationOutcome::Verified);
}

#[test]
fn fetch_failure_leaves_resource_content_less() {
    let resource = verify(
        &FailingFetcher,
        &FakeDns::good(),
        &tag_with_integrity(&format!("sha256-{BODY_SHA256}")),
    );

    assert!(!resource.has_content());
    assert!(resource.digests().is_empty());
    assert!(!resource.integrity_verified());
    // The host still resolved; only the fetch failed.
    assert!(resource.hostname_valid());
    assert_eq!(resource.outcome(), VerificationOutcome::FetchFailed);
    assert!(matches!(
        resource.fetch_error(),
        Some(FetchError::Network(_))
    ));
}

#[test]
fn host_vanishing_after_failed_fetch_is_unresolvable() {
    // The pre-check resolves, the fetch fails, and the post-failure
    // re-check no longer resolves: the resource ends up host-invalid, not
    // merely fetch-failed.
    let dns = VanishingDns::new();
    let resource = verify(
        &FailingFetcher,
        &dns,
        &tag_with_integrity(&format!("sha256-{BODY_SHA256}")),
    );

    assert_eq!(resource.hostname(), HostnameCheck::Unresolvable);
    assert!(!resource.hostname_valid());
    assert!(resource.fetch_error().is_some());
    assert!(!resource.has_content());
    assert_eq!(resource.outcome(), VerificationOutcome::HostUnresolvable);
}

#[test]
fn untrusted_cname_is_not_masked_by_successful_fetch() {
    let fetcher = StaticFetcher::new(BODY);
    let dns = FakeDns {
        resolvable: true,
        untrusted_cname: true,
    };
    let resource = verify(&fetcher, &dns, &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    // Lenient view says the host was fine; strict view keeps the CNAME flag.
    assert!(resource.hostname_valid());
    assert!(!resource.hostname_strictly_valid());
    assert_eq!(
        resource.hostname(),
        HostnameCheck::Resolved {
            cname_trusted: false,
            fetched: true,
        }
    );
    // Integrity verification itself is unaffected.
    assert!(resource.integrity_verified());
}

#[test]
fn invalid_source_url_skips_fetch() {
    let fetcher = StaticFetcher::new(BODY);
    let dns = FakeDns::good();
    let verifier = ResourceVerifier::new(&fetcher, &dns);
    let resource = verifier.verify("not a url", "<script src=\"x\"></script>");

    assert_eq!(fetcher.call_count(), 0);
    assert_eq!(resource.outcome(), VerificationOutcome::HostUnresolvable);
}

#[test]
fn unknown_algorithm_declaration_is_mismatch() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity("sha3-deadbeef"));

    assert!(resource.declared_integrity().is_some());
    assert!(!resource.integrity_verified());
    assert_eq!(resource.outcome(), VerificationOutcome::Mismatch);
}

#[test]
fn malformed_declaration_without_hyphen_is_no_declaration() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity("garbage"));

    assert_eq!(resource.declared_integrity(), None);
    assert!(!resource.integrity_verified());
    assert_eq!(resource.outcome(), VerificationOutcome::NoDeclaration);
}

#[test]
fn digests_cover_whole_universe_after_fetch() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    for alg in DigestAlgorithm::ALL {
        assert!(resource.digests().get(alg).is_some());
    }
}

#[test]
fn custom_tag_name_verifies_link_elements() {
    let fetcher = StaticFetcher::new(BODY);
    let dns = FakeDns::good();
    let verifier = ResourceVerifier::new(&fetcher, &dns).with_tag_name("link");
    let tag = format!(r#"<link rel="stylesheet" href="{SRC}" integrity="sha256-{BODY_SHA256}">"#);
    let resource = verifier.verify(SRC, &tag);

    assert!(resource.tag().found());
    assert!(resource.integrity_verified());
}

#[test]
fn report_serializes_to_json() {
    let fetcher = StaticFetcher::new(BODY);
    let resource = verify(&fetcher, &FakeDns::good(), &tag_with_integrity(&format!("sha256-{BODY_SHA256}")));

    let json = serde_json::to_value(resource.report()).unwrap();
    assert_eq!(json["outcome"], "verified");
    assert_eq!(json["source_url"], SRC);
    assert_eq!(json["digests"]["sha256"], BODY_SHA256);
    assert_eq!(json["declared_integrity"]["algorithm"], "sha256");
}
