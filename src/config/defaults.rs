//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default API base URL.
pub const BASE_URL: &str = "https://api.hookbase.app";

/// Default per-attempt timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default number of retries after the first attempt.
pub const MAX_RETRIES: u32 = 3;

/// Default webhook replay window in seconds.
pub const WEBHOOK_TOLERANCE_SECS: u64 = 300;

/// Default path written by `hookbase init`.
pub const CONFIG_FILE: &str = "hookbase.toml";

/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("hookbase-rust/", env!("CARGO_PKG_VERSION"));

/// Default per-attempt timeout as Duration.
#[must_use]
pub const fn timeout() -> Duration {
    Duration::from_secs(TIMEOUT_SECS)
}

/// Default webhook replay window as Duration.
#[must_use]
pub const fn webhook_tolerance() -> Duration {
    Duration::from_secs(WEBHOOK_TOLERANCE_SECS)
}
