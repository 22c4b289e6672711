//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Hookbase: webhook signing, verification and API access
///
/// Signs and verifies webhook payloads locally, and sends authenticated
/// requests to the Hookbase API with automatic retries.
#[derive(Debug, Parser)]
#[command(name = "hookbase")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// API key sent as a bearer token
    #[arg(long = "api-key", global = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Per-attempt timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Retries after the first attempt
    #[arg(long = "max-retries", global = true)]
    pub max_retries: Option<u32>,

    /// Log every API attempt at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    /// Webhook signing secret (`whsec_` prefix optional)
    #[arg(long, global = true)]
    pub secret: Option<String>,

    /// Webhook replay window in seconds
    #[arg(long, global = true)]
    pub tolerance: Option<u64>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for hookbase
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = super::defaults::CONFIG_FILE)]
        output: PathBuf,
    },

    /// Print the headers a sender would attach to a payload
    Sign {
        /// File containing the payload (`-` for stdin)
        #[arg(long)]
        payload: PathBuf,

        /// Message id (random `msg_...` if omitted)
        #[arg(long)]
        id: Option<String>,

        /// Unix timestamp in seconds (now if omitted)
        #[arg(long, allow_negative_numbers = true)]
        timestamp: Option<i64>,
    },

    /// Verify a signed payload and print its JSON
    Verify {
        /// File containing the raw payload (`-` for stdin)
        #[arg(long)]
        payload: PathBuf,

        /// Received headers in 'Key: Value' or 'Key=Value' format (can be specified multiple times)
        #[arg(long = "header", short = 'H', value_name = "K: V")]
        headers: Vec<String>,
    },

    /// Send one request to the API and print the JSON response
    Request {
        /// HTTP method
        method: String,

        /// Path below the base URL, e.g. /api/sources
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,

        /// Query parameters in 'key=value' format (can be specified multiple times)
        #[arg(long = "query", short = 'q', value_name = "K=V")]
        query: Vec<String>,

        /// Idempotency key reused across retries
        #[arg(long = "idempotency-key")]
        idempotency_key: Option<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Parses CLI arguments from an iterator, returning clap errors.
    ///
    /// # Errors
    ///
    /// Returns the clap error for unknown flags or missing arguments.
    pub fn try_parse_from_iter<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}
