//! Integrity engine
//!
//! Pure digest computation and comparison over already-fetched bytes.
//! Digests are encoded as standard padded base64, the form the `integrity`
//! attribute uses on the wire.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use md5::Md5;
use serde::Serialize;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// The fixed SRI algorithm universe.
///
/// sha1 and md5 are not valid in declarations per the W3C spec, but the tool
/// still computes them: a page declaring one is itself a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
    Sha384,
    Sha512,
    Sha1,
    Md5,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 5] = [
        DigestAlgorithm::Sha256,
        DigestAlgorithm::Sha384,
        DigestAlgorithm::Sha512,
        DigestAlgorithm::Sha1,
        DigestAlgorithm::Md5,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha384 => "sha384",
            DigestAlgorithm::Sha512 => "sha512",
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Md5 => "md5",
        }
    }

    /// Map an attribute token ("sha256", "md5", ...) to an algorithm.
    /// Unknown tokens are a lookup miss, not an error.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "sha256" => Some(DigestAlgorithm::Sha256),
            "sha384" => Some(DigestAlgorithm::Sha384),
            "sha512" => Some(DigestAlgorithm::Sha512),
            "sha1" => Some(DigestAlgorithm::Sha1),
            "md5" => Some(DigestAlgorithm::Md5),
            _ => None,
        }
    }

    fn base64_digest(&self, bytes: &[u8]) -> String {
        let raw = match self {
            DigestAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
            DigestAlgorithm::Sha384 => Sha384::digest(bytes).to_vec(),
            DigestAlgorithm::Sha512 => Sha512::digest(bytes).to_vec(),
            DigestAlgorithm::Sha1 => Sha1::digest(bytes).to_vec(),
            DigestAlgorithm::Md5 => Md5::digest(bytes).to_vec(),
        };
        BASE64.encode(raw)
    }
}

/// An `integrity` attribute value split into its two halves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntegrityDeclaration {
    pub algorithm: String,
    pub digest: String,
}

impl IntegrityDeclaration {
    /// Split `algorithm-base64digest` on the first hyphen. A value without a
    /// hyphen carries no usable declaration.
    pub fn parse(value: &str) -> Option<Self> {
        let (algorithm, digest) = value.split_once('-')?;
        Some(Self {
            algorithm: algorithm.to_string(),
            digest: digest.to_string(),
        })
    }
}

/// Base64 digests of one resource body, keyed by algorithm.
///
/// Empty when the resource had no content; never mutated once computed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DigestSet {
    values: BTreeMap<DigestAlgorithm, String>,
}

impl DigestSet {
    /// Digest `bytes` under every algorithm in the universe. Deterministic.
    pub fn compute(bytes: &[u8]) -> Self {
        let values = DigestAlgorithm::ALL
            .iter()
            .map(|alg| (*alg, alg.base64_digest(bytes)))
            .collect();
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, algorithm: DigestAlgorithm) -> Option<&str> {
        self.values.get(&algorithm).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DigestAlgorithm, &str)> {
        self.values.iter().map(|(alg, digest)| (*alg, digest.as_str()))
    }

    /// True iff `token` names a known algorithm present in the set and the
    /// stored base64 string equals `expected` exactly (case-sensitive).
    pub fn matches(&self, token: &str, expected: &str) -> bool {
        match DigestAlgorithm::from_token(token) {
            Some(algorithm) => self.get(algorithm) == Some(expected),
            None => false,
        }
    }

    /// Check a raw `integrity` attribute value against this set. A missing
    /// or malformed declaration is "not verified", never an error.
    pub fn verify_declaration(&self, value: &str) -> bool {
        match IntegrityDeclaration::parse(value) {
            Some(declaration) => self.matches(&declaration.algorithm, &declaration.digest),
            None => false,
        }
    }
}
