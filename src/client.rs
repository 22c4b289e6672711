//! Entry points for calling the Hookbase API.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, ConfigError};
use crate::error::Error;
use crate::resources::{Dlq, Messages, Sources};
use crate::time::{BlockingSleeper, Sleeper, ThreadSleeper, TokioSleeper};
use crate::transport::{
    ApiRequest, BlockingHttpClient, BlockingTransport, HttpClient, ReqwestBlockingClient,
    ReqwestClient, Transport,
};

/// Asynchronous Hookbase API client.
///
/// Cheap to share by reference across tasks; every call is an independent
/// logical request with its own retry budget.
///
/// # Example
///
/// ```no_run
/// use hookbase::Hookbase;
/// use hookbase::resources::ListSourcesParams;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = Hookbase::new("hb_live_xxx")?;
///
/// let page = client.sources().list(&ListSourcesParams::default()).await?;
/// for source in &page.data {
///     println!("{} ({})", source.name, source.id);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Hookbase<H = ReqwestClient, S = TokioSleeper> {
    transport: Transport<H, S>,
}

impl Hookbase {
    /// Creates a client with default settings and its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty or not a
    /// valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::from_config(&ClientConfig::new(api_key)?))
    }

    /// Creates a client from explicit settings.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::from_transport(Transport::new(ReqwestClient::new(), config))
    }

    /// Creates a client on top of a caller-owned reqwest client.
    ///
    /// The caller's connection pool is shared, and stays usable after this
    /// client is dropped.
    #[must_use]
    pub fn with_http_client(config: &ClientConfig, client: reqwest::Client) -> Self {
        Self::from_transport(Transport::new(ReqwestClient::from_client(client), config))
    }
}

impl<H, S> Hookbase<H, S> {
    /// Wraps a preconfigured transport.
    #[must_use]
    pub const fn from_transport(transport: Transport<H, S>) -> Self {
        Self { transport }
    }

    /// Returns the transport, for fetching further pages.
    #[must_use]
    pub const fn transport(&self) -> &Transport<H, S> {
        &self.transport
    }
}

impl<H: HttpClient, S: Sleeper> Hookbase<H, S> {
    /// Inbound webhook sources.
    #[must_use]
    pub const fn sources(&self) -> Sources<'_, H, S> {
        Sources::new(&self.transport)
    }

    /// Outbound event delivery.
    #[must_use]
    pub const fn messages(&self) -> Messages<'_, H, S> {
        Messages::new(&self.transport)
    }

    /// Dead-letter queue of outbound messages.
    #[must_use]
    pub const fn dlq(&self) -> Dlq<'_, H, S> {
        Dlq::new(&self.transport)
    }

    /// Sends an arbitrary request, for endpoints without a typed wrapper.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute`].
    pub async fn request(&self, request: &ApiRequest) -> Result<Option<Value>, Error> {
        self.transport.execute(request).await
    }

    /// Sends an arbitrary request and deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`Transport::execute_as`].
    pub async fn request_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        self.transport.execute_as(request).await
    }
}

/// Blocking Hookbase API client.
///
/// Offers the raw request surface of [`Hookbase`] for programs without an
/// async runtime. Must not be created, used or dropped inside one.
#[derive(Debug)]
pub struct BlockingHookbase<H = ReqwestBlockingClient, S = ThreadSleeper> {
    transport: BlockingTransport<H, S>,
}

impl BlockingHookbase {
    /// Creates a client with default settings and its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty or not a
    /// valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(Self::from_config(&ClientConfig::new(api_key)?))
    }

    /// Creates a client from explicit settings.
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::from_transport(BlockingTransport::new(ReqwestBlockingClient::new(), config))
    }

    /// Creates a client on top of a caller-owned reqwest blocking client.
    #[must_use]
    pub fn with_http_client(config: &ClientConfig, client: reqwest::blocking::Client) -> Self {
        Self::from_transport(BlockingTransport::new(
            ReqwestBlockingClient::from_client(client),
            config,
        ))
    }
}

impl<H, S> BlockingHookbase<H, S> {
    /// Wraps a preconfigured transport.
    #[must_use]
    pub const fn from_transport(transport: BlockingTransport<H, S>) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &BlockingTransport<H, S> {
        &self.transport
    }
}

impl<H: BlockingHttpClient, S: BlockingSleeper> BlockingHookbase<H, S> {
    /// Sends a request on the calling thread.
    ///
    /// # Errors
    ///
    /// See [`BlockingTransport::execute`].
    pub fn request(&self, request: &ApiRequest) -> Result<Option<Value>, Error> {
        self.transport.execute(request)
    }

    /// Sends a request and deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// See [`BlockingTransport::execute_as`].
    pub fn request_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T, Error> {
        self.transport.execute_as(request)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
