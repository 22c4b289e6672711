//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the binary. All validation is performed during construction.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::webhook::{Secret, Webhook};

use super::ClientConfig;
use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the binary.
///
/// The API key and webhook secret are optional here because each command
/// needs only one of them; [`client_config`](Self::client_config) and
/// [`webhook`](Self::webhook) report the missing one.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// API client settings, if an API key was supplied
    pub client: Option<ClientConfig>,

    /// Decoded webhook secret, if one was supplied
    pub secret: Option<Secret>,

    /// Webhook replay window
    pub tolerance: Duration,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let client = self
            .client
            .as_ref()
            .map_or_else(|| "none".to_string(), ToString::to_string);

        write!(
            f,
            "Config {{ client: {client}, secret: {}, tolerance: {}s }}",
            if self.secret.is_some() { "set" } else { "none" },
            self.tolerance.as_secs(),
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// Priority for every field: explicit CLI value, then TOML, then default.
    /// The `debug` flag is enabled if either source enables it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The API key or base URL is invalid
    /// - The timeout or tolerance is zero
    /// - The webhook secret cannot be decoded
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let client = Self::resolve_client(cli, toml)?;
        let secret = Self::resolve_secret(cli, toml)?;
        let tolerance = Self::resolve_tolerance(cli, toml)?;

        Ok(Self {
            client,
            secret,
            tolerance,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the client settings, or an error naming how to supply a key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no API key was supplied.
    pub fn client_config(&self) -> Result<&ClientConfig, ConfigError> {
        self.client.as_ref().ok_or_else(|| {
            ConfigError::missing(
                field::API_KEY,
                "Use --api-key or set client.api_key in config file",
            )
        })
    }

    /// Builds a webhook verifier from the configured secret and tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no secret was supplied.
    pub fn webhook(&self) -> Result<Webhook, ConfigError> {
        let secret = self.secret.clone().ok_or_else(|| {
            ConfigError::missing(
                field::SECRET,
                "Use --secret or set webhook.secret in config file",
            )
        })?;

        Ok(Webhook::from_secret(secret).with_tolerance(self.tolerance))
    }

    fn resolve_client(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<ClientConfig>, ConfigError> {
        let section = toml.map(|t| &t.client);

        // CLI takes precedence
        let Some(api_key) = cli
            .api_key
            .as_deref()
            .or_else(|| section.and_then(|s| s.api_key.as_deref()))
        else {
            return Ok(None);
        };

        let base_url = cli
            .base_url
            .as_deref()
            .or_else(|| section.and_then(|s| s.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let timeout_secs = cli
            .timeout
            .or_else(|| section.and_then(|s| s.timeout))
            .unwrap_or(defaults::TIMEOUT_SECS);

        if timeout_secs == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        let max_retries = cli
            .max_retries
            .or_else(|| section.and_then(|s| s.max_retries))
            .unwrap_or(defaults::MAX_RETRIES);

        // Flags only enable
        let debug = cli.debug || section.is_some_and(|s| s.debug);

        let config = ClientConfig::new(api_key)?
            .with_base_url(base_url)?
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_max_retries(max_retries)
            .with_debug(debug);

        Ok(Some(config))
    }

    fn resolve_secret(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<Secret>, ConfigError> {
        cli.secret
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.secret.as_deref()))
            .map(Secret::decode)
            .transpose()
            .map_err(ConfigError::from)
    }

    fn resolve_tolerance(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .tolerance
            .or_else(|| toml.and_then(|t| t.webhook.tolerance))
            .unwrap_or(defaults::WEBHOOK_TOLERANCE_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "tolerance",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Splits a header given as `Key: Value` or `Key=Value`.
///
/// The colon form is tried first, since header values often contain `=`
/// (base64 padding).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidHeader`] if neither separator is present or
/// the name is empty.
pub fn parse_header_string(s: &str) -> Result<(String, String), ConfigError> {
    let (name, value) = s
        .split_once(':')
        .or_else(|| s.split_once('='))
        .ok_or_else(|| ConfigError::InvalidHeader {
            value: s.to_string(),
        })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::InvalidHeader {
            value: s.to_string(),
        });
    }

    Ok((name.to_string(), value.trim().to_string()))
}

/// Splits a query parameter given as `key=value`. The value may be empty
/// and may itself contain `=`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidQuery`] if there is no `=` or the key is empty.
pub fn parse_query_string(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(ConfigError::InvalidQuery {
            value: s.to_string(),
        }),
    }
}
