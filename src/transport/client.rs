//! Production HTTP clients backed by reqwest.

use super::{BlockingHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse};

/// Asynchronous HTTP client using `reqwest::Client`.
///
/// A client created with [`new`](Self::new) owns its connection pool, which
/// is released when the last clone is dropped. A client created with
/// [`from_client`](Self::from_client) shares the caller's pool; dropping it
/// never tears that pool down.
///
/// # Example
///
/// ```no_run
/// use hookbase::transport::{HttpClient, HttpRequest, ReqwestClient};
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ReqwestClient::new();
/// let url = Url::parse("https://api.hookbase.app/api/sources")?;
/// let response = client.request(HttpRequest::get(url)).await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client with its own connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    /// Wraps a caller-supplied reqwest client.
    ///
    /// Useful for custom TLS, proxies or pool settings.
    #[must_use]
    pub const fn from_client(client: reqwest::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    async fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(map_reqwest_error)?
            .to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

/// Blocking HTTP client using `reqwest::blocking::Client`.
///
/// Ownership follows [`ReqwestClient`]. Like every reqwest blocking client,
/// it must not be created or dropped inside an async runtime.
#[derive(Debug, Clone)]
pub struct ReqwestBlockingClient {
    inner: reqwest::blocking::Client,
}

impl ReqwestBlockingClient {
    /// Creates a client with its own connection pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: reqwest::blocking::Client::new(),
        }
    }

    /// Wraps a caller-supplied reqwest blocking client.
    #[must_use]
    pub const fn from_client(client: reqwest::blocking::Client) -> Self {
        Self { inner: client }
    }
}

impl Default for ReqwestBlockingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockingHttpClient for ReqwestBlockingClient {
    fn request(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .inner
            .request(req.method, req.url.as_str())
            .headers(req.headers);

        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().map_err(map_reqwest_error)?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().map_err(map_reqwest_error)?.to_vec();

        Ok(HttpResponse::new(status, headers, body))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HttpError {
    if e.is_timeout() {
        HttpError::Timeout
    } else if e.is_builder() {
        HttpError::InvalidUrl(e.to_string())
    } else {
        HttpError::Connection(Box::new(e))
    }
}
