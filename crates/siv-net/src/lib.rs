//! siv Networking
//!
//! Production implementations of the siv-core collaborator traits:
//! [`HttpFetcher`] retrieves resource bytes over HTTPS, [`DnsValidator`]
//! answers the resolvability and CNAME-trust questions.

mod dns;
mod http;

pub use dns::DnsValidator;
pub use http::HttpFetcher;
