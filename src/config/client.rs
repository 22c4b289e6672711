//! Settings for one API client instance.

use std::fmt;
use std::time::Duration;

use http::HeaderValue;
use url::Url;

use super::ConfigError;
use super::defaults;

/// Connection settings shared by [`Hookbase`](crate::Hookbase) and
/// [`BlockingHookbase`](crate::BlockingHookbase).
///
/// The API key is validated once, here; the rest of the fields have defaults
/// and are set with the `with_*` builders.
///
/// # Example
///
/// ```
/// use hookbase::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::new("hb_live_xxx")?
///     .with_base_url("https://staging.hookbase.app/")?
///     .with_timeout(Duration::from_secs(10))
///     .with_max_retries(5);
///
/// assert_eq!(config.base_url(), "https://staging.hookbase.app");
/// # Ok::<(), hookbase::config::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    api_key: String,
    authorization: HeaderValue,
    base_url: String,
    timeout: Duration,
    max_retries: u32,
    debug: bool,
}

impl ClientConfig {
    /// Creates settings for the given API key with default values elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiKey`] if the key is empty or contains
    /// characters not allowed in an HTTP header.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::InvalidApiKey {
                reason: "must not be empty".to_string(),
            });
        }

        let mut authorization = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| ConfigError::InvalidApiKey {
                reason: e.to_string(),
            })?;
        authorization.set_sensitive(true);

        Ok(Self {
            api_key,
            authorization,
            base_url: defaults::BASE_URL.to_string(),
            timeout: defaults::timeout(),
            max_retries: defaults::MAX_RETRIES,
            debug: false,
        })
    }

    /// Sets the API base URL. Trailing slashes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL is not an absolute
    /// `http` or `https` URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("must not have a query or fragment".to_string()));
        }

        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Sets the timeout applied to every physical attempt.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets how many times a failed attempt may be retried.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Enables per-attempt debug logging for clients built from these settings.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Returns the API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry budget.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns whether debug logging is enabled.
    #[must_use]
    pub const fn debug(&self) -> bool {
        self.debug
    }

    pub(crate) const fn authorization(&self) -> &HeaderValue {
        &self.authorization
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("debug", &self.debug)
            .finish()
    }
}

impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Client {{ base_url: {}, timeout: {}s, max_retries: {}, debug: {} }}",
            self.base_url,
            self.timeout.as_secs_f64(),
            self.max_retries,
            self.debug,
        )
    }
}
