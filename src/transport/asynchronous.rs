//! Asynchronous transport with retry support.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::time::{Sleeper, TokioSleeper};

use super::attempt::{Outcome, evaluate};
use super::{ApiRequest, Endpoint, HttpClient, RetryPolicy};

/// Executes logical API requests as up to `max_retries + 1` HTTP attempts.
///
/// Both the HTTP call and the backoff wait are await points, so dropping the
/// returned future cancels the request between or during attempts.
/// Concurrent calls share the HTTP client but nothing else.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper implementation for retry delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use hookbase::config::ClientConfig;
/// use hookbase::transport::{ApiRequest, ReqwestClient, Transport};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("hb_live_xxx")?;
/// let transport = Transport::new(ReqwestClient::new(), &config);
///
/// let sources = transport.execute(&ApiRequest::get("/api/sources")).await?;
/// println!("{sources:?}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Transport<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    endpoint: Endpoint,
    retry_policy: RetryPolicy,
    debug: bool,
}

impl<H> Transport<H, TokioSleeper> {
    /// Creates a transport using the given settings and [`TokioSleeper`].
    #[must_use]
    pub fn new(client: H, config: &ClientConfig) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            endpoint: Endpoint::from_config(config),
            retry_policy: RetryPolicy::new().with_max_retries(config.max_retries()),
            debug: config.debug(),
        }
    }
}

impl<H, S> Transport<H, S> {
    /// Sets a custom sleeper for retry delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> Transport<H, S2> {
        Transport {
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

impl<H: HttpClient, S: Sleeper> Transport<H, S> {
    /// Executes a request, retrying transient failures.
    ///
    /// Returns `None` for 204 and empty 2xx bodies.
    ///
    /// # Errors
    ///
    /// Returns the error of the last attempt once the error is not retryable
    /// or the retry budget is spent.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Option<Value>, Error> {
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
            let result = self.client.request(http.clone()).await;

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
                    self.sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Executes a request and deserializes the body into `T`.
    ///
    /// A missing body is deserialized from JSON `null`, so `T = ()` or
    /// `Option<_>` suit endpoints that answer 204.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute), plus [`Error::Json`] if the body does
    /// not fit `T`.
    pub async fn execute_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        let body = self.execute(request).await?.unwrap_or(Value::Null);
        Ok(serde_json::from_value(body)?)
    }
}
