//! Transport layer for talking to the Hookbase API.
//!
//! This module provides types and traits for:
//! - Building HTTP requests ([`HttpRequest`]) from logical ones ([`ApiRequest`])
//! - Handling HTTP responses ([`HttpResponse`])
//! - Abstracting HTTP clients ([`HttpClient`], [`BlockingHttpClient`])
//! - Production HTTP client implementations ([`ReqwestClient`], [`ReqwestBlockingClient`])
//! - Requests with retries ([`Transport`], [`BlockingTransport`])
//! - Retry policy configuration ([`RetryPolicy`])

mod asynchronous;
mod attempt;
mod backoff;
mod blocking;
mod classify;
mod client;
mod error;
mod http;
mod request;

#[cfg(test)]
mod backoff_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use asynchronous::Transport;
pub use attempt::{REQUEST_ID_HEADER, RETRY_AFTER_HEADER, interpret};
pub use backoff::RetryPolicy;
pub use blocking::BlockingTransport;
pub use classify::{IsRetryable, RETRYABLE_STATUSES, classify, is_retryable_status, parse_retry_after};
pub use client::{ReqwestBlockingClient, ReqwestClient};
pub use error::HttpError;
pub use http::{BlockingHttpClient, HttpClient, HttpRequest, HttpResponse};
pub use request::{ApiRequest, Endpoint, IDEMPOTENCY_KEY};
