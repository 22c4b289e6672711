//! The decision taken after each physical attempt.
//!
//! Both execution modes feed every attempt result through [`evaluate`] and
//! differ only in how they wait before the next attempt.

use std::time::Duration;

use http::StatusCode;
use serde_json::{Map, Value};

use crate::error::{ApiError, Error, MAX_RETRY_AFTER};

use super::classify::{IsRetryable, classify, parse_retry_after};
use super::{HttpError, HttpResponse, RetryPolicy};

/// Response header carrying the server-side request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Response header carrying the rate-limit wait, in seconds.
pub const RETRY_AFTER_HEADER: &str = "retry-after";

/// What the retry loop does next.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// The logical request succeeded.
    Done(Option<Value>),
    /// Wait `delay`, then try again. `error` is what this attempt produced.
    Retry { delay: Duration, error: Error },
    /// The logical request failed for good.
    Fail(Error),
}

/// Decides the fate of attempt `attempt` (0-indexed).
pub(crate) fn evaluate(
    result: Result<HttpResponse, HttpError>,
    attempt: u32,
    policy: &RetryPolicy,
    timeout: Duration,
) -> Outcome {
    let error = match result {
        Ok(response) => match interpret(&response) {
            Ok(body) => return Outcome::Done(body),
            Err(error) => error,
        },
        Err(fault) => from_fault(fault, timeout),
    };

    if !error.is_retryable() || !policy.should_retry(attempt) {
        return Outcome::Fail(error);
    }

    let delay = match error.as_api().and_then(ApiError::retry_after) {
        // Server guidance replaces the backoff formula, up to a ceiling.
        Some(seconds) => {
            Duration::try_from_secs_f64(seconds.min(MAX_RETRY_AFTER)).unwrap_or_default()
        }
        None => policy.delay_for_retry(attempt),
    };

    Outcome::Retry { delay, error }
}

/// Turns a response into its JSON body or a classified error.
///
/// - 204, or a 2xx with an empty body, yields `None`.
/// - Any other 2xx must be JSON.
/// - A non-2xx body that is not JSON is treated as `{}`.
///
/// # Errors
///
/// Returns [`Error::Api`] for non-2xx statuses and [`Error::Json`] for a 2xx
/// body that is not JSON.
pub fn interpret(response: &HttpResponse) -> Result<Option<Value>, Error> {
    if response.is_success() {
        if response.status == StatusCode::NO_CONTENT
            || response.body.iter().all(u8::is_ascii_whitespace)
        {
            return Ok(None);
        }
        return Ok(Some(serde_json::from_slice(&response.body)?));
    }

    let body = serde_json::from_slice(&response.body).unwrap_or_else(|_| Value::Object(Map::new()));
    let request_id = response.header(REQUEST_ID_HEADER).map(ToString::to_string);

    let mut error = classify(response.status, &body, request_id);
    if let Some(seconds) = response.header(RETRY_AFTER_HEADER).and_then(parse_retry_after) {
        error.set_retry_after(seconds);
    }

    Err(Error::Api(error))
}

fn from_fault(fault: HttpError, timeout: Duration) -> Error {
    match fault {
        HttpError::Timeout => Error::Timeout { timeout },
        HttpError::Connection(source) => Error::Network(source),
        HttpError::InvalidUrl(reason) => Error::InvalidUrl(reason),
    }
}
