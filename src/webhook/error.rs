//! Error types for webhook signing and verification.

use std::fmt;

use thiserror::Error;

/// Error raised while decoding a signing secret.
///
/// This is a configuration error: it surfaces when a [`Webhook`] is built,
/// never during verification, so a bad secret cannot silently produce
/// signatures over garbage key material.
///
/// [`Webhook`]: super::Webhook
#[derive(Debug, Error)]
pub enum SecretError {
    /// The secret (after prefix removal) is empty.
    #[error("Webhook secret is required")]
    Empty,

    /// The secret (after prefix removal) is not valid standard base64.
    #[error("Webhook secret is not valid base64: {0}")]
    InvalidBase64(#[source] base64::DecodeError),
}

/// The reason a webhook was rejected.
///
/// The [`Display`](fmt::Display) text of each reason is the message carried by
/// [`WebhookVerificationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationFailure {
    /// A required header is absent or empty. Holds the lowercase header name.
    MissingHeader(&'static str),

    /// The timestamp header is not an integer.
    InvalidTimestamp,

    /// The timestamp is further from "now" than the configured tolerance.
    TimestampOutOfTolerance {
        /// Absolute difference between now and the webhook timestamp, in seconds.
        skew_secs: u64,
        /// Allowed difference, in seconds.
        tolerance_secs: u64,
    },

    /// The signature header contains no `version,value` tokens.
    NoValidSignatures,

    /// No `v1` candidate matched the expected signature.
    SignatureMismatch,

    /// The body is not UTF-8 or not valid JSON.
    InvalidPayload,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader(name) => write!(f, "Missing {name} header"),
            Self::InvalidTimestamp => f.write_str("Invalid timestamp format"),
            Self::TimestampOutOfTolerance {
                skew_secs,
                tolerance_secs,
            } => write!(
                f,
                "Webhook timestamp is outside tolerance ({skew_secs}s > {tolerance_secs}s)"
            ),
            Self::NoValidSignatures => f.write_str("No valid signatures found"),
            Self::SignatureMismatch => f.write_str("Webhook signature verification failed"),
            Self::InvalidPayload => f.write_str("Invalid JSON payload"),
        }
    }
}

/// Error raised when an inbound webhook fails verification.
///
/// Every failure is terminal: the caller should reject the webhook.
/// Callers that only need a message can rely on [`Display`](fmt::Display);
/// [`reason`](Self::reason) is available for finer handling.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct WebhookVerificationError {
    reason: VerificationFailure,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl WebhookVerificationError {
    pub(crate) const fn new(reason: VerificationFailure) -> Self {
        Self {
            reason,
            source: None,
        }
    }

    pub(crate) fn with_source(
        reason: VerificationFailure,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            reason,
            source: Some(Box::new(source)),
        }
    }

    /// Returns why verification failed.
    #[must_use]
    pub const fn reason(&self) -> &VerificationFailure {
        &self.reason
    }
}

impl From<VerificationFailure> for WebhookVerificationError {
    fn from(reason: VerificationFailure) -> Self {
        Self::new(reason)
    }
}
