//! Outbound event delivery.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::time::Sleeper;
use crate::transport::{ApiRequest, HttpClient, Transport};

use super::unwrap_envelope;

/// Body of [`Messages::send`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEventParams {
    /// Application whose subscribed endpoints receive the event
    pub application_id: String,
    /// Event type used for subscription matching
    pub event_type: String,
    /// Event payload delivered to endpoints
    pub payload: Map<String, Value>,
    /// Caller-chosen event id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Extra data stored with the event but not delivered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    /// Restricts delivery to these endpoints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_ids: Option<Vec<String>>,
}

impl SendEventParams {
    /// Creates parameters for the required fields.
    #[must_use]
    pub fn new(
        application_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: Map<String, Value>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            event_type: event_type.into(),
            payload,
            event_id: None,
            metadata: None,
            endpoint_ids: None,
        }
    }
}

/// An endpoint a sent event was queued for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEventEndpoint {
    /// Endpoint id
    pub id: String,
    /// Endpoint URL
    #[serde(default)]
    pub url: String,
}

/// Result of [`Messages::send`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendEventResponse {
    /// Id of the stored event
    pub event_id: String,
    /// Number of outbound messages created
    pub messages_queued: u64,
    /// Endpoints the event was queued for
    pub endpoints: Vec<SendEventEndpoint>,
}

/// The send-event namespace.
#[derive(Debug)]
pub struct Messages<'a, H, S> {
    transport: &'a Transport<H, S>,
}

impl<'a, H, S> Messages<'a, H, S> {
    pub(crate) const fn new(transport: &'a Transport<H, S>) -> Self {
        Self { transport }
    }
}

impl<H: HttpClient, S: Sleeper> Messages<'_, H, S> {
    /// Sends an event to the application's subscribed endpoints.
    ///
    /// With an idempotency key, every retry of this call carries the same
    /// key, so the server queues the event at most once.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::InvalidHeader`] if the key is
    /// not a valid header value.
    pub async fn send(
        &self,
        params: &SendEventParams,
        idempotency_key: Option<&str>,
    ) -> Result<SendEventResponse, Error> {
        let mut request = ApiRequest::post("/api/send-event").with_body(serde_json::to_value(params)?);
        if let Some(key) = idempotency_key {
            request = request.with_idempotency_key(key);
        }

        let body = self.transport.execute(&request).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "data"))?)
    }
}
