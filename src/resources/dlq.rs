//! Dead-letter queue of outbound messages that exhausted their attempts.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::json;

use crate::error::Error;
use crate::pagination::CursorPage;
use crate::time::Sleeper;
use crate::transport::{ApiRequest, HttpClient, Transport};

use super::unwrap_envelope;

const PATH: &str = "/api/outbound-messages/dlq";

/// An outbound message parked in the dead-letter queue.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlqMessage {
    /// Outbound message id
    pub id: String,
    /// Message the delivery belongs to
    #[serde(default)]
    pub message_id: String,
    /// Target endpoint
    #[serde(default)]
    pub endpoint_id: String,
    /// Target endpoint URL
    #[serde(default)]
    pub endpoint_url: Option<String>,
    /// Owning application
    #[serde(default)]
    pub application_id: String,
    /// Owning application name
    #[serde(default)]
    pub application_name: Option<String>,
    /// Event type of the message
    #[serde(default)]
    pub event_type: String,
    /// Delivery status
    #[serde(default)]
    pub status: String,
    /// Why the message was dead-lettered
    #[serde(default)]
    pub dlq_reason: Option<String>,
    /// Time the message was dead-lettered
    #[serde(default)]
    pub dlq_moved_at: Option<String>,
    /// Delivery attempts made
    #[serde(default)]
    pub attempts: u32,
    /// Attempt limit that was exhausted
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Time of the latest attempt
    #[serde(default)]
    pub last_attempt_at: Option<String>,
    /// HTTP status of the latest attempt
    #[serde(default)]
    pub last_response_status: Option<u16>,
    /// Error of the latest attempt
    #[serde(default)]
    pub last_error: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: String,
    /// Last update time
    #[serde(default)]
    pub updated_at: String,
}

const fn default_max_attempts() -> u32 {
    5
}

/// Dead-lettered message count for one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlqEndpointStat {
    /// Endpoint id
    pub endpoint_id: String,
    /// Endpoint URL
    #[serde(default)]
    pub endpoint_url: String,
    /// Dead-lettered messages for this endpoint
    #[serde(default)]
    pub count: u64,
}

/// Summary of the dead-letter queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlqStats {
    /// Messages in the queue
    pub total: u64,
    /// Message count per dead-letter reason
    pub by_reason: HashMap<String, u64>,
    /// Endpoints with the most dead-lettered messages
    pub top_failing_endpoints: Vec<DlqEndpointStat>,
}

/// Result of re-queueing one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlqRetryResult {
    /// Dead-lettered message that was re-queued
    pub original_message_id: String,
    /// Outbound message created by the retry
    pub new_message_id: String,
    /// Status of the new message
    pub status: String,
}

/// Per-message outcome of [`Dlq::retry_bulk`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlqBulkRetryItem {
    /// Dead-lettered message id
    pub message_id: String,
    /// `retried` or `failed`
    pub status: String,
    /// Outbound message created by the retry
    pub new_message_id: Option<String>,
    /// Why the retry failed
    pub error: Option<String>,
}

/// Result of [`Dlq::retry_bulk`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlqBulkRetryResult {
    /// Messages requested
    pub total: u64,
    /// Messages re-queued
    pub retried: u64,
    /// Messages that could not be re-queued
    pub failed: u64,
    /// Per-message outcomes
    pub results: Vec<DlqBulkRetryItem>,
}

/// Result of [`Dlq::bulk_delete`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DlqBulkDeleteResult {
    /// Messages requested
    pub total: u64,
    /// Messages removed
    pub deleted: u64,
}

/// Filters for [`Dlq::list`].
#[derive(Debug, Clone, Default)]
pub struct ListDlqParams {
    /// Items per page
    pub limit: Option<u32>,
    /// Cursor from a previous page
    pub cursor: Option<String>,
    /// Only messages for this endpoint
    pub endpoint_id: Option<String>,
    /// Only messages for this application
    pub application_id: Option<String>,
    /// Only messages dead-lettered for this reason
    pub dlq_reason: Option<String>,
    /// Only messages of this event type
    pub event_type: Option<String>,
}

impl ListDlqParams {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get(format!("{PATH}/messages"))
            .with_optional_query("limit", self.limit)
            .with_optional_query("cursor", self.cursor.as_deref())
            .with_optional_query("endpointId", self.endpoint_id.as_deref())
            .with_optional_query("applicationId", self.application_id.as_deref())
            .with_optional_query("dlqReason", self.dlq_reason.as_deref())
            .with_optional_query("eventType", self.event_type.as_deref())
    }
}

/// The `/api/outbound-messages/dlq` namespace.
#[derive(Debug)]
pub struct Dlq<'a, H, S> {
    transport: &'a Transport<H, S>,
}

impl<'a, H, S> Dlq<'a, H, S> {
    pub(crate) const fn new(transport: &'a Transport<H, S>) -> Self {
        Self { transport }
    }
}

impl<H: HttpClient, S: Sleeper> Dlq<'_, H, S> {
    /// Lists dead-lettered messages, newest first.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::Json`] on an unexpected body.
    pub async fn list(&self, params: &ListDlqParams) -> Result<CursorPage<DlqMessage>, Error> {
        CursorPage::fetch(self.transport, params.to_request()).await
    }

    /// Returns queue totals by reason and the worst endpoints.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn stats(&self) -> Result<DlqStats, Error> {
        let body = self.transport.execute(&ApiRequest::get(format!("{PATH}/stats"))).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "data"))?)
    }

    /// Re-queues one message as a new outbound message.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn retry(&self, id: &str) -> Result<DlqRetryResult, Error> {
        let request = ApiRequest::post(format!("{PATH}/{id}/retry"));
        let body = self.transport.execute(&request).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "data"))?)
    }

    /// Re-queues several messages.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn retry_bulk(&self, ids: &[&str]) -> Result<DlqBulkRetryResult, Error> {
        let request = ApiRequest::post(format!("{PATH}/retry-bulk")).with_body(json!({ "ids": ids }));
        self.transport.execute_as(&request).await
    }

    /// Removes one message from the queue.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport.execute(&ApiRequest::delete(format!("{PATH}/{id}"))).await?;
        Ok(())
    }

    /// Removes several messages from the queue.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn bulk_delete(&self, ids: &[&str]) -> Result<DlqBulkDeleteResult, Error> {
        let request = ApiRequest::delete(format!("{PATH}/bulk")).with_body(json!({ "ids": ids }));
        self.transport.execute_as(&request).await
    }
}
