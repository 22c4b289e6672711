//! Webhook signing protocol for payloads delivered to customer endpoints.
//!
//! This module provides:
//! - Secret decoding ([`Secret`])
//! - HMAC-SHA256 signing over the canonical signed string ([`Signer`])
//! - Verification of inbound deliveries and test-header generation ([`Webhook`])
//!
//! The canonical signed string is `{webhook-id}.{webhook-timestamp}.{body}`
//! and the signature header carries one or more `v1,<base64>` tokens.

mod error;
mod secret;
mod signer;
mod verifier;


pub use error::{SecretError, VerificationFailure, WebhookVerificationError};
pub use secret::{SECRET_PREFIX, Secret};
pub use signer::{
    SIGNATURE_VERSION, SignatureCandidate, Signer, parse_signature_header, signed_content,
};
pub use verifier::{DEFAULT_TOLERANCE, Webhook, WebhookHeaders, header};
