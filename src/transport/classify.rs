//! Mapping of non-2xx responses to typed errors, and retry eligibility.

use http::StatusCode;
use serde_json::{Map, Value};

use crate::error::{
    ApiError, ApiErrorKind, DEFAULT_RETRY_AFTER, Error, MAX_RETRY_AFTER, ValidationErrors,
};

use super::HttpError;

/// Statuses worth another attempt: rate limiting, conflicts and transient
/// server failures.
pub const RETRYABLE_STATUSES: [StatusCode; 6] = [
    StatusCode::CONFLICT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Returns true if a response with this status may be retried.
#[must_use]
pub fn is_retryable_status(status: StatusCode) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

/// Builds a typed error from a non-2xx status and its parsed body.
///
/// The body may carry the error as `{"error": "text"}`, as
/// `{"error": {"message", "code", "validationErrors"}}`, or at the top level.
/// Anything that is not an object is treated as `{}`.
#[must_use]
pub fn classify(status: StatusCode, body: &Value, request_id: Option<String>) -> ApiError {
    let empty = Map::new();
    let body = body.as_object().unwrap_or(&empty);

    let (message, server_code, details) = match body.get("error") {
        Some(Value::String(text)) => (Some(text.clone()), None, None),
        Some(Value::Object(error)) => (
            str_field(error, "message").or_else(|| str_field(body, "message")),
            str_field(error, "code"),
            Some(error),
        ),
        // No `error` key: the body itself is the error object.
        None => (
            str_field(body, "message"),
            str_field(body, "code"),
            Some(body),
        ),
        Some(_) => (str_field(body, "message"), None, None),
    };

    let kind = match status.as_u16() {
        401 => ApiErrorKind::Authentication,
        403 => ApiErrorKind::Forbidden,
        404 => ApiErrorKind::NotFound,
        400 | 422 => ApiErrorKind::Validation {
            validation_errors: details.and_then(validation_errors),
        },
        409 => ApiErrorKind::Conflict,
        429 => ApiErrorKind::RateLimit {
            retry_after: details
                .and_then(|d| d.get("retryAfter"))
                .and_then(Value::as_f64)
                .and_then(sanitize_retry_after)
                .unwrap_or(DEFAULT_RETRY_AFTER),
        },
        _ => ApiErrorKind::Other,
    };

    let code = kind.fixed_code().map_or_else(
        || server_code.unwrap_or_else(|| "unknown_error".to_string()),
        ToString::to_string,
    );

    ApiError {
        kind,
        status,
        code,
        request_id,
        message: message.unwrap_or_else(|| format!("API error: {}", status.as_u16())),
    }
}

/// Parses a `retry-after` header value in (possibly fractional) seconds.
///
/// Negative, non-finite and unparsable values yield `None`; values above
/// [`MAX_RETRY_AFTER`] are clamped to it.
#[must_use]
pub fn parse_retry_after(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().and_then(sanitize_retry_after)
}

fn sanitize_retry_after(seconds: f64) -> Option<f64> {
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds.min(MAX_RETRY_AFTER))
}

fn str_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Reads `validationErrors`, accepting a single string where a list is expected.
fn validation_errors(error: &Map<String, Value>) -> Option<ValidationErrors> {
    let fields = error.get("validationErrors")?.as_object()?;
    Some(
        fields
            .iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    Value::Array(items) => items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(ToString::to_string)
                        .collect(),
                    Value::String(text) => vec![text.clone()],
                    _ => Vec::new(),
                };
                (field.clone(), messages)
            })
            .collect(),
    )
}

/// Extension trait for checking if an error is retryable.
///
/// Determines whether a failed attempt represents a transient failure that
/// warrants another attempt, budget permitting.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(_) | Self::Timeout => true,
            Self::InvalidUrl(_) => false,
        }
    }
}

impl IsRetryable for ApiError {
    fn is_retryable(&self) -> bool {
        is_retryable_status(self.status)
    }
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            Self::Timeout { .. } | Self::Network(_) => true,
            Self::InvalidUrl(_) | Self::InvalidHeader(_) | Self::Json(_) => false,
        }
    }
}
