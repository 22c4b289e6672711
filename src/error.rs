//! Errors surfaced by API calls.
//!
//! Every failure of a logical request ends up as one [`Error`]. Errors coming
//! from the server are [`Error::Api`], whose [`ApiErrorKind`] callers branch on;
//! faults that never produced a response are [`Error::Timeout`] and
//! [`Error::Network`].

use std::collections::HashMap;
use std::time::Duration;

use thiserror::Error;

/// Field name to list of messages, as reported by a validation failure.
pub type ValidationErrors = HashMap<String, Vec<String>>;

/// Default wait suggested by a rate-limit error without a server hint.
pub const DEFAULT_RETRY_AFTER: f64 = 60.0;

/// Longest server-suggested wait honoured before retrying, in seconds.
///
/// Larger hints are clamped to this value.
pub const MAX_RETRY_AFTER: f64 = 3600.0;

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The last attempt did not complete within the per-attempt timeout.
    #[error("Request timed out after {}s", timeout.as_secs_f64())]
    Timeout {
        /// The per-attempt timeout that was exceeded.
        timeout: Duration,
    },

    /// The request could not reach the server.
    #[error("Network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The request URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A caller-supplied header value (such as an idempotency key) is not
    /// a valid header value.
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),

    /// A request body could not be encoded, or a response body decoded.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the API error, if the server answered.
    #[must_use]
    pub const fn as_api(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the HTTP status, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        self.as_api().map(|e| e.status)
    }
}

/// The category of an [`ApiError`], derived from the HTTP status.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiErrorKind {
    /// 401: missing or invalid API key.
    Authentication,
    /// 403: the key lacks access, or a plan limit was hit.
    Forbidden,
    /// 404: no such resource.
    NotFound,
    /// 400 or 422: the request was rejected.
    Validation {
        /// Per-field messages, when the server supplied them.
        validation_errors: Option<ValidationErrors>,
    },
    /// 409: the resource is in a conflicting state.
    Conflict,
    /// 429: too many requests.
    RateLimit {
        /// Seconds to wait before retrying.
        retry_after: f64,
    },
    /// Any other non-2xx status.
    Other,
}

impl ApiErrorKind {
    /// Returns the fixed error code for this kind, or `None` for
    /// [`Other`](Self::Other), which keeps the server's code.
    #[must_use]
    pub const fn fixed_code(&self) -> Option<&'static str> {
        match self {
            Self::Authentication => Some("authentication_error"),
            Self::Forbidden => Some("forbidden"),
            Self::NotFound => Some("not_found"),
            Self::Validation { .. } => Some("validation_error"),
            Self::Conflict => Some("conflict"),
            Self::RateLimit { .. } => Some("rate_limit_exceeded"),
            Self::Other => None,
        }
    }
}

/// Error returned by the Hookbase API.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Category derived from the status.
    pub kind: ApiErrorKind,
    /// HTTP status of the response.
    pub status: http::StatusCode,
    /// Machine-readable error code.
    pub code: String,
    /// Value of the `x-request-id` response header.
    pub request_id: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Returns the retry hint of a rate-limit error.
    #[must_use]
    pub const fn retry_after(&self) -> Option<f64> {
        match self.kind {
            ApiErrorKind::RateLimit { retry_after } => Some(retry_after),
            _ => None,
        }
    }

    /// Returns per-field messages of a validation error.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match &self.kind {
            ApiErrorKind::Validation { validation_errors } => validation_errors.as_ref(),
            _ => None,
        }
    }

    /// Overrides the retry hint of a rate-limit error. No-op for other kinds.
    pub(crate) fn set_retry_after(&mut self, seconds: f64) {
        if let ApiErrorKind::RateLimit { retry_after } = &mut self.kind {
            *retry_after = seconds;
        }
    }
}
