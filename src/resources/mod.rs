//! Typed wrappers for a subset of the Hookbase API.
//!
//! Each namespace borrows the client's [`Transport`](crate::transport::Transport)
//! and is created on demand by [`Hookbase`](crate::Hookbase):
//! - Inbound sources ([`Sources`])
//! - Outbound event delivery ([`Messages`])
//! - Dead-letter queue ([`Dlq`])
//!
//! Models deserialize from the API's camelCase JSON and ignore unknown fields.

mod dlq;
mod messages;
mod sources;

#[cfg(test)]
mod messages_tests;
#[cfg(test)]
mod sources_tests;

pub use dlq::{
    Dlq, DlqBulkDeleteResult, DlqBulkRetryItem, DlqBulkRetryResult, DlqEndpointStat, DlqMessage,
    DlqRetryResult, DlqStats, ListDlqParams,
};
pub use messages::{Messages, SendEventEndpoint, SendEventParams, SendEventResponse};
pub use sources::{CreateSourceParams, ListSourcesParams, Source, Sources, UpdateSourceParams};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Returns `body[key]` if the body is an object holding `key`, else the body
/// itself. A missing body becomes `null`.
pub(crate) fn unwrap_envelope(body: Option<Value>, key: &str) -> Value {
    match body {
        Some(Value::Object(mut object)) => match object.remove(key) {
            Some(inner) => inner,
            None => Value::Object(object),
        },
        Some(other) => other,
        None => Value::Null,
    }
}

/// Accepts `true`/`false` as well as the `0`/`1` some endpoints return.
pub(crate) fn bool_or_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Int(n) => n != 0,
    })
}

/// Accepts a list of strings, or a JSON-encoded list stored as a string.
/// Anything unparsable becomes `None`.
pub(crate) fn string_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(encoded)) => serde_json::from_str(&encoded).ok(),
        Some(list @ Value::Array(_)) => serde_json::from_value(list).ok(),
        _ => None,
    })
}
