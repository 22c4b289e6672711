//! HMAC-SHA256 signing over the canonical signed string.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::Secret;

type HmacSha256 = Hmac<Sha256>;

/// The only signature scheme currently recognized.
pub const SIGNATURE_VERSION: &str = "v1";

/// Builds the canonical signed string `{id}.{timestamp}.{body}`.
///
/// Both signing and verification go through this function; the body is
/// included verbatim, with no re-serialization or encoding change.
#[must_use]
pub fn signed_content(id: &str, timestamp: &str, body: &str) -> String {
    format!("{id}.{timestamp}.{body}")
}

/// One `version,signature` token from a signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureCandidate<'a> {
    /// Scheme version, e.g. `v1`.
    pub version: &'a str,
    /// Encoded signature value.
    pub value: &'a str,
}

/// Parses a space-separated list of `version,signature` tokens.
///
/// Tokens without a comma are dropped. Values may themselves contain commas;
/// only the first comma separates version from value.
#[must_use]
pub fn parse_signature_header(header: &str) -> Vec<SignatureCandidate<'_>> {
    header
        .split(' ')
        .filter_map(|token| token.split_once(','))
        .map(|(version, value)| SignatureCandidate { version, value })
        .collect()
}

/// Computes and checks base64 HMAC-SHA256 signatures for one secret.
#[derive(Debug, Clone)]
pub struct Signer {
    secret: Secret,
}

impl Signer {
    /// Creates a signer for the given secret.
    #[must_use]
    pub const fn new(secret: Secret) -> Self {
        Self { secret }
    }

    fn digest(&self, content: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(content.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    /// Signs `content`, returning the standard-base64 digest.
    #[must_use]
    pub fn sign(&self, content: &str) -> String {
        STANDARD.encode(self.digest(content))
    }

    /// Checks a base64 candidate against the signature of `content`.
    ///
    /// Comparison is constant-time over the decoded bytes. A candidate that is
    /// not valid base64 is a non-match, never an error.
    #[must_use]
    pub fn verify(&self, content: &str, candidate: &str) -> bool {
        let Ok(actual) = STANDARD.decode(candidate) else {
            return false;
        };
        let expected = self.digest(content);
        expected.as_slice().ct_eq(actual.as_slice()).into()
    }
}
