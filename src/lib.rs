//! Hookbase: client for the Hookbase webhook routing API
//!
//! A library for calling the Hookbase API with automatic retries and for
//! signing and verifying the webhooks Hookbase delivers.

pub mod client;
pub mod config;
pub mod error;
pub mod pagination;
pub mod resources;
pub mod time;
pub mod transport;
pub mod webhook;

pub use client::{BlockingHookbase, Hookbase};
pub use error::{ApiError, ApiErrorKind, Error};
pub use webhook::{Webhook, WebhookVerificationError};
