//! Logical API requests and their translation into HTTP requests.

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue, USER_AGENT};
use http::{HeaderMap, Method};
use serde_json::Value;
use std::time::Duration;

use crate::config::{ClientConfig, defaults};
use crate::error::Error;

use super::HttpRequest;

/// Header carrying the caller's idempotency key.
pub const IDEMPOTENCY_KEY: HeaderName = HeaderName::from_static("idempotency-key");

/// One logical API call, independent of how many attempts it takes.
///
/// The same value is replayed on every retry, so the idempotency key is
/// stable across attempts.
///
/// # Example
///
/// ```
/// use hookbase::transport::ApiRequest;
///
/// let request = ApiRequest::get("/api/sources")
///     .with_query("page", 2)
///     .with_optional_query("search", None::<&str>);
///
/// assert_eq!(request.query, vec![("page".to_string(), "2".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// JSON body
    pub body: Option<Value>,
    /// Value for the `Idempotency-Key` header
    pub idempotency_key: Option<String>,
}

impl ApiRequest {
    /// Creates a request with no query, body or idempotency key.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            idempotency_key: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Creates a PATCH request.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// Creates a DELETE request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Appends a query parameter if `value` is present; absent values are dropped.
    #[must_use]
    pub fn with_optional_query(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.with_query(key, value),
            None => self,
        }
    }

    /// Sets the JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the idempotency key.
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }
}

/// Base URL, default headers and per-attempt timeout of one client.
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl Endpoint {
    /// Captures the connection settings of a client configuration.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(AUTHORIZATION, config.authorization().clone());
        headers.insert(USER_AGENT, HeaderValue::from_static(defaults::USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            base_url: config.base_url().to_string(),
            headers,
            timeout: config.timeout(),
        }
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves the full URL of a request, query string included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if the joined URL does not parse.
    pub fn url(&self, request: &ApiRequest) -> Result<url::Url, Error> {
        let separator = if request.path.starts_with('/') { "" } else { "/" };
        let joined = format!("{}{separator}{}", self.base_url, request.path);

        let mut url = url::Url::parse(&joined).map_err(|e| Error::InvalidUrl(format!("{joined}: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    /// Builds the HTTP request sent on every attempt of `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL does not parse, the body cannot be
    /// encoded, or the idempotency key is not a valid header value.
    pub fn build(&self, request: &ApiRequest) -> Result<HttpRequest, Error> {
        let mut http = HttpRequest::new(request.method.clone(), self.url(request)?)
            .with_timeout(self.timeout);
        http.headers = self.headers.clone();

        if let Some(ref body) = request.body {
            http.headers
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            http.body = Some(serde_json::to_vec(body)?);
        }

        if let Some(key) = request.idempotency_key.as_deref().filter(|k| !k.is_empty()) {
            http.headers.insert(IDEMPOTENCY_KEY, HeaderValue::from_str(key)?);
        }

        Ok(http)
    }
}
