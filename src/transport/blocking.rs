//! Blocking transport with the same retry semantics as [`Transport`](super::Transport).

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::time::{BlockingSleeper, ThreadSleeper};

use super::attempt::{Outcome, evaluate};
use super::{ApiRequest, BlockingHttpClient, Endpoint, RetryPolicy};

/// Executes logical API requests on the calling thread.
///
/// Waits between attempts block the thread. Must not be used from inside an
/// async runtime; use [`Transport`](super::Transport) there.
#[derive(Debug)]
pub struct BlockingTransport<H, S = ThreadSleeper> {
    client: H,
    sleeper: S,
    endpoint: Endpoint,
    retry_policy: RetryPolicy,
    debug: bool,
}

impl<H> BlockingTransport<H, ThreadSleeper> {
    /// Creates a transport using the given settings and [`ThreadSleeper`].
    #[must_use]
    pub fn new(client: H, config: &ClientConfig) -> Self {
        Self {
            client,
            sleeper: ThreadSleeper,
            endpoint: Endpoint::from_config(config),
            retry_policy: RetryPolicy::new().with_max_retries(config.max_retries()),
            debug: config.debug(),
        }
    }
}

impl<H, S> BlockingTransport<H, S> {
    /// Sets a custom sleeper for retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> BlockingTransport<H, S2> {
        BlockingTransport {
            client: self.client,
            sleeper,
            endpoint: self.endpoint,
            retry_policy: self.retry_policy,
            debug: self.debug,
        }
    }

    /// Replaces the retry policy, budget included.
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Returns the configured retry policy.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the underlying HTTP client.
    #[must_use]
    pub const fn client(&self) -> &H {
        &self.client
    }
}

impl<H: BlockingHttpClient, S: BlockingSleeper> BlockingTransport<H, S> {
    /// Executes a request, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt once the error is not retryable
    /// or the retry budget is spent.
    pub fn execute(&self, request: &ApiRequest) -> Result<Option<Value>, Error> {
        let http = self.endpoint.build(request)?;

        if self.debug {
            tracing::debug!(
                "[Hookbase] {} {} params={:?}",
                request.method,
                request.path,
                request.query
            );
        }

        let mut attempt = 0;
        loop {
            let result = self.client.request(http.clone());

            match evaluate(result, attempt, &self.retry_policy, self.endpoint.timeout()) {
                Outcome::Done(body) => {
                    if self.debug {
                        tracing::debug!("[Hookbase] {} {} succeeded", request.method, request.path);
                    }
                    return Ok(body);
                }
                Outcome::Fail(error) => return Err(error),
                Outcome::Retry { delay, error } => {
                    if self.debug {
                        tracing::warn!(
                            "[Hookbase] {} {} failed (attempt {}/{}): {error}; retrying in {:.2}s",
                            request.method,
                            request.path,
                            attempt + 1,
                            self.retry_policy.max_attempts(),
                            delay.as_secs_f64()
                        );
                    }
                    self.sleeper.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    /// Executes a request and deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus [`Error::Json`] if the body does
    /// not fit `T`.
    pub fn execute_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        let body = self.execute(request)?.unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }
}
