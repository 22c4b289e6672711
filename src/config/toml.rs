//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// API client section
    #[serde(default)]
    pub client: ClientSection,

    /// Webhook verification section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// API client section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// API key sent as a bearer token
    pub api_key: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout: Option<u64>,

    /// Retries after the first attempt
    pub max_retries: Option<u32>,

    /// Log every attempt at debug level
    #[serde(default)]
    pub debug: bool,
}

/// Webhook verification section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Signing secret (`whsec_` prefix optional)
    pub secret: Option<String>,

    /// Replay window in seconds
    pub tolerance: Option<u64>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Hookbase Configuration File

[client]
# API key (required for `hookbase request`, can be overridden by --api-key)
# api_key = "hb_live_xxx"

# API base URL (default: https://api.hookbase.app)
# base_url = "https://api.hookbase.app"

# Per-attempt timeout in seconds (default: 30)
# timeout = 30

# Retries after the first attempt (default: 3)
# max_retries = 3

# Log every attempt at debug level
# debug = false

[webhook]
# Signing secret used by `hookbase sign` and `hookbase verify`
# secret = "whsec_..."

# Replay window in seconds (default: 300)
# tolerance = 300
"#
    .to_string()
}
