//! Hostname validation contract
//!
//! DNS is an external collaborator: the pipeline only needs a yes/no on
//! resolvability (checked before any fetch is attempted) and a yes/no on
//! whether the CNAME chain looks hijackable. What counts as an untrusted
//! CNAME is the implementation's policy; `siv-net` ships a resolver with a
//! configurable suffix list.

/// Reports on the DNS posture of a hostname.
///
/// Both calls may block on DNS I/O. Bounded lookup time is the
/// implementation's contract, not the pipeline's.
pub trait HostnameValidator: Send + Sync {
    /// True if the host has at least one valid address record.
    fn is_resolvable(&self, host: &str) -> bool;

    /// True if any resolved CNAME in the chain matches a takeover-prone
    /// pattern (dangling target, wildcard-abusable provider, ...).
    fn has_untrusted_cname(&self, host: &str) -> bool;
}
