//! Webhook signing secret.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::SecretError;

/// Marker prepended to secrets shown in the dashboard.
pub const SECRET_PREFIX: &str = "whsec_";

/// Decoded HMAC key material.
///
/// Secrets are distributed as standard base64, optionally prefixed with
/// [`SECRET_PREFIX`]. Decoding happens once, at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    key: Vec<u8>,
}

impl Secret {
    /// Decodes a secret string.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Empty`] if nothing remains after prefix removal,
    /// or [`SecretError::InvalidBase64`] if the remainder is not base64.
    pub fn decode(encoded: &str) -> Result<Self, SecretError> {
        let body = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);
        if body.is_empty() {
            return Err(SecretError::Empty);
        }

        let key = STANDARD.decode(body).map_err(SecretError::InvalidBase64)?;
        if key.is_empty() {
            return Err(SecretError::Empty);
        }

        Ok(Self { key })
    }

    /// Wraps raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::Empty`] if `key` is empty.
    pub fn from_bytes(key: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let key = key.into();
        if key.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self { key })
    }

    /// Returns the secret in its prefixed, encoded form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{SECRET_PREFIX}{}", STANDARD.encode(&self.key))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.key
    }
}

impl FromStr for Secret {
    type Err = SecretError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret").field("key", &"[REDACTED]").finish()
    }
}
