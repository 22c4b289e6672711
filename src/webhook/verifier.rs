//! Inbound webhook verification and test-header generation.

use std::collections::HashMap;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::de::DeserializeOwned;

use crate::time::{Clock, SystemClock};

use super::signer::{SIGNATURE_VERSION, parse_signature_header, signed_content};
use super::{Secret, SecretError, Signer, VerificationFailure, WebhookVerificationError};

/// Default replay window (5 minutes).
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(300);

/// Header names used by the signing protocol (lowercase).
pub mod header {
    /// Message id header.
    pub const ID: &str = "webhook-id";
    /// Unix-seconds timestamp header.
    pub const TIMESTAMP: &str = "webhook-timestamp";
    /// Space-separated `version,signature` list.
    pub const SIGNATURE: &str = "webhook-signature";
}

/// The three headers a sender attaches to a signed webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookHeaders {
    /// Value of `webhook-id`.
    pub id: String,
    /// Value of `webhook-timestamp`.
    pub timestamp: String,
    /// Value of `webhook-signature`.
    pub signature: String,
}

impl WebhookHeaders {
    /// Iterates `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (header::ID, self.id.as_str()),
            (header::TIMESTAMP, self.timestamp.as_str()),
            (header::SIGNATURE, self.signature.as_str()),
        ]
        .into_iter()
    }

    /// Converts to an [`http::HeaderMap`].
    ///
    /// # Errors
    ///
    /// Returns an error if a value contains bytes not allowed in a header
    /// (only possible with a caller-supplied id).
    pub fn to_header_map(&self) -> Result<http::HeaderMap, http::header::InvalidHeaderValue> {
        let mut map = http::HeaderMap::with_capacity(3);
        for (name, value) in self.iter() {
            map.insert(
                http::HeaderName::from_static(name),
                http::HeaderValue::from_str(value)?,
            );
        }
        Ok(map)
    }
}

impl<'a> IntoIterator for &'a WebhookHeaders {
    type Item = (&'static str, &'a str);
    type IntoIter = std::array::IntoIter<(&'static str, &'a str), 3>;

    fn into_iter(self) -> Self::IntoIter {
        [
            (header::ID, self.id.as_str()),
            (header::TIMESTAMP, self.timestamp.as_str()),
            (header::SIGNATURE, self.signature.as_str()),
        ]
        .into_iter()
    }
}

/// Verifies payloads delivered to an endpoint, and signs test payloads.
///
/// Verification is a single pass that stops at the first failure:
///
/// 1. header lookup (case-insensitive)
/// 2. presence of `webhook-id`, `webhook-timestamp`, `webhook-signature`
/// 3. timestamp within the tolerance window (before any signature work)
/// 4. signature header parsing
/// 5. constant-time comparison against every `v1` candidate
/// 6. JSON parsing of the body
///
/// # Example
///
/// ```
/// use hookbase::webhook::Webhook;
///
/// let webhook = Webhook::new("whsec_dGVzdC1zZWNyZXQta2V5LWZvci13ZWJob29rLXNpZ24=")?;
/// let payload = r#"{"event":"test"}"#;
/// let headers = webhook.generate_test_headers(payload, None, None);
///
/// let parsed = webhook.verify(payload, &headers)?;
/// assert_eq!(parsed["event"], "test");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Webhook<C = SystemClock> {
    signer: Signer,
    tolerance: Duration,
    clock: C,
}

impl Webhook<SystemClock> {
    /// Creates a verifier from an encoded secret (`whsec_` prefix optional).
    ///
    /// # Errors
    ///
    /// Returns [`SecretError`] if the secret is empty or not base64.
    pub fn new(secret: &str) -> Result<Self, SecretError> {
        Ok(Self::from_secret(Secret::decode(secret)?))
    }

    /// Creates a verifier from an already decoded secret.
    #[must_use]
    pub const fn from_secret(secret: Secret) -> Self {
        Self {
            signer: Signer::new(secret),
            tolerance: DEFAULT_TOLERANCE,
            clock: SystemClock,
        }
    }
}

impl<C> Webhook<C> {
    /// Sets the replay window.
    #[must_use]
    pub const fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the clock used for the replay window and default timestamps.
    #[must_use]
    pub fn with_clock<C2>(self, clock: C2) -> Webhook<C2> {
        Webhook {
            signer: self.signer,
            tolerance: self.tolerance,
            clock,
        }
    }

    /// Returns the configured replay window.
    #[must_use]
    pub const fn tolerance(&self) -> Duration {
        self.tolerance
    }
}

impl<C: Clock> Webhook<C> {
    /// Verifies a webhook and returns its parsed JSON body.
    ///
    /// `payload` is the raw body exactly as received. `headers` is any
    /// collection of `(name, value)` pairs; names are matched
    /// case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookVerificationError`] on the first failed step.
    pub fn verify<I, K, V>(
        &self,
        payload: impl AsRef<[u8]>,
        headers: I,
    ) -> Result<serde_json::Value, WebhookVerificationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.verify_as(payload, headers)
    }

    /// Verifies a webhook and deserializes its body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookVerificationError`] on the first failed step;
    /// a body that does not fit `T` is reported as an invalid payload.
    pub fn verify_as<T, I, K, V>(
        &self,
        payload: impl AsRef<[u8]>,
        headers: I,
    ) -> Result<T, WebhookVerificationError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let body = self
            .check(payload.as_ref(), &normalize_headers(headers))
            .inspect_err(|e| tracing::debug!("Rejected webhook: {e}"))?;

        serde_json::from_str(body)
            .map_err(|e| WebhookVerificationError::with_source(VerificationFailure::InvalidPayload, e))
    }

    /// Verifies a webhook whose headers arrived as an [`http::HeaderMap`].
    ///
    /// Header values that are not visible ASCII are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookVerificationError`] on the first failed step.
    pub fn verify_header_map(
        &self,
        payload: impl AsRef<[u8]>,
        headers: &http::HeaderMap,
    ) -> Result<serde_json::Value, WebhookVerificationError> {
        let pairs = headers
            .iter()
            .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str(), v)));
        self.verify(payload, pairs)
    }

    /// Produces the headers a genuine sender would attach to `payload`.
    ///
    /// Without a non-empty id a random `msg_…` id is generated; without an
    /// explicit timestamp the current Unix time is used.
    #[must_use]
    pub fn generate_test_headers(
        &self,
        payload: &str,
        id: Option<&str>,
        timestamp: Option<i64>,
    ) -> WebhookHeaders {
        let id = id
            .filter(|id| !id.is_empty())
            .map_or_else(random_message_id, ToString::to_string);
        let timestamp = timestamp
            .unwrap_or_else(|| self.clock.unix_seconds())
            .to_string();

        let signature = self.signer.sign(&signed_content(&id, &timestamp, payload));

        WebhookHeaders {
            id,
            timestamp,
            signature: format!("{SIGNATURE_VERSION},{signature}"),
        }
    }

    /// Runs steps 2-5 and returns the decoded body on success.
    fn check<'p>(
        &self,
        payload: &'p [u8],
        headers: &HashMap<String, String>,
    ) -> Result<&'p str, WebhookVerificationError> {
        let id = required(headers, header::ID)?;
        let timestamp = required(headers, header::TIMESTAMP)?;
        let signature = required(headers, header::SIGNATURE)?;

        self.check_timestamp(timestamp)?;

        // Decode once; the same text is signed and parsed.
        let body = std::str::from_utf8(payload)
            .map_err(|e| WebhookVerificationError::with_source(VerificationFailure::InvalidPayload, e))?;

        self.check_signature(body, id, timestamp, signature)?;

        Ok(body)
    }

    fn check_timestamp(&self, timestamp: &str) -> Result<(), VerificationFailure> {
        let sent: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| VerificationFailure::InvalidTimestamp)?;

        let now = self.clock.unix_seconds();
        let skew = (i128::from(now) - i128::from(sent)).unsigned_abs();
        let tolerance = self.tolerance.as_secs();

        if skew > u128::from(tolerance) {
            return Err(VerificationFailure::TimestampOutOfTolerance {
                skew_secs: u64::try_from(skew).unwrap_or(u64::MAX),
                tolerance_secs: tolerance,
            });
        }
        Ok(())
    }

    fn check_signature(
        &self,
        body: &str,
        id: &str,
        timestamp: &str,
        signature: &str,
    ) -> Result<(), VerificationFailure> {
        let candidates = parse_signature_header(signature);
        if candidates.is_empty() {
            return Err(VerificationFailure::NoValidSignatures);
        }

        let content = signed_content(id, timestamp, body);
        let matched = candidates
            .iter()
            .filter(|c| c.version == SIGNATURE_VERSION)
            .any(|c| self.signer.verify(&content, c.value));

        if matched {
            Ok(())
        } else {
            Err(VerificationFailure::SignatureMismatch)
        }
    }
}

fn normalize_headers<I, K, V>(headers: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    headers
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.as_ref().to_string()))
        .collect()
}

fn required<'h>(
    headers: &'h HashMap<String, String>,
    name: &'static str,
) -> Result<&'h str, VerificationFailure> {
    headers
        .get(name)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or(VerificationFailure::MissingHeader(name))
}

fn random_message_id() -> String {
    let bytes: [u8; 18] = rand::random();
    format!("msg_{}", URL_SAFE_NO_PAD.encode(bytes))
}
