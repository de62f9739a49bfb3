//! DNS hostname validator
//!
//! Wraps hickory's synchronous resolver behind the [`HostnameValidator`]
//! trait. Resolvability is an address lookup; CNAME trust is a lookup of the
//! CNAME chain checked against a suffix list of takeover-prone hosting
//! targets. The list is policy and therefore configurable.

use std::io;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::Resolver;
use siv_core::HostnameValidator;

/// CNAME targets commonly left dangling or re-claimable on shared hosting.
const DEFAULT_FLAGGED_SUFFIXES: &[&str] = &[
    "s3.amazonaws.com",
    "github.io",
    "herokuapp.com",
    "azurewebsites.net",
    "cloudapp.net",
    "trafficmanager.net",
    "ghs.googlehosted.com",
];

/// Answers hostname questions via live DNS.
pub struct DnsValidator {
    resolver: Resolver,
    flagged_suffixes: Vec<String>,
}

impl DnsValidator {
    /// Validator with the default resolver configuration and flag list.
    pub fn new() -> io::Result<Self> {
        Self::with_flagged_suffixes(
            DEFAULT_FLAGGED_SUFFIXES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    /// Validator with a caller-supplied untrusted-CNAME suffix list.
    pub fn with_flagged_suffixes(flagged_suffixes: Vec<String>) -> io::Result<Self> {
        let resolver = Resolver::new(ResolverConfig::default(), ResolverOpts::default())?;
        Ok(Self {
            resolver,
            flagged_suffixes,
        })
    }

    fn cname_is_flagged(&self, target: &str) -> bool {
        let target = target.trim_end_matches('.').to_ascii_lowercase();
        self.flagged_suffixes
            .iter()
            .any(|suffix| suffix_matches(&target, suffix))
    }
}

impl HostnameValidator for DnsValidator {
    fn is_resolvable(&self, host: &str) -> bool {
        match self.resolver.lookup_ip(host) {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(err) => {
                tracing::debug!(host, error = %err, "address lookup failed");
                false
            }
        }
    }

    fn has_untrusted_cname(&self, host: &str) -> bool {
        // A failed lookup means no CNAMEs were observed, not distrust.
        let lookup = match self.resolver.lookup(host, RecordType::CNAME) {
            Ok(lookup) => lookup,
            Err(err) => {
                tracing::debug!(host, error = %err, "CNAME lookup failed");
                return false;
            }
        };

        for rdata in lookup.iter() {
            if let RData::CNAME(cname) = rdata {
                let target = cname.0.to_utf8();
                if self.cname_is_flagged(&target) {
                    tracing::warn!(host, cname = target, "CNAME matches flagged suffix");
                    return true;
                }
            }
        }
        false
    }
}

/// Suffix match on DNS name boundaries: `suffix` itself, or any name under
/// it, but not a host that merely ends with the same characters.
fn suffix_matches(target: &str, suffix: &str) -> bool {
    target == suffix || target.ends_with(&format!(".{suffix}"))
}
