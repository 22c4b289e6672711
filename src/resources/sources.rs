//! Inbound webhook sources.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::pagination::OffsetPage;
use crate::time::Sleeper;
use crate::transport::{ApiRequest, HttpClient, Transport};

use super::{bool_or_int, string_list, unwrap_envelope};

const PATH: &str = "/api/sources";

/// An endpoint that receives webhooks from a provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Source id
    pub id: String,
    /// Owning organization
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Display name
    pub name: String,
    /// URL-safe identifier used in the ingest URL
    pub slug: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
    /// Provider preset, such as `github` or `stripe`
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Whether ingestion is enabled
    #[serde(default = "default_true", deserialize_with = "bool_or_int")]
    pub is_active: bool,
    /// Signing secret; only returned on create and when revealed
    #[serde(default)]
    pub signing_secret: Option<String>,
    /// Public URL providers post to
    #[serde(default)]
    pub ingest_url: Option<String>,
    /// Whether inbound signatures are checked
    #[serde(default, deserialize_with = "bool_or_int")]
    pub verify_signature: bool,
    /// Deduplication strategy
    #[serde(default)]
    pub dedup_strategy: Option<String>,
    /// Deduplication window in seconds
    #[serde(default)]
    pub dedup_window: Option<u64>,
    /// IP filter mode: `none`, `allowlist` or `denylist`
    #[serde(default = "default_ip_filter_mode")]
    pub ip_filter_mode: String,
    /// Allowed client addresses
    #[serde(default, deserialize_with = "string_list")]
    pub ip_allowlist: Option<Vec<String>>,
    /// Denied client addresses
    #[serde(default, deserialize_with = "string_list")]
    pub ip_denylist: Option<Vec<String>>,
    /// Requests allowed per rate-limit window
    #[serde(default)]
    pub rate_limit: Option<u64>,
    /// Rate-limit window in seconds
    #[serde(default)]
    pub rate_limit_window: Option<u64>,
    /// Events received so far
    #[serde(default)]
    pub event_count: u64,
    /// Time of the latest event
    #[serde(default)]
    pub last_event_at: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: String,
    /// Last update time
    #[serde(default)]
    pub updated_at: String,
}

fn default_provider() -> String {
    "generic".to_string()
}

fn default_ip_filter_mode() -> String {
    "none".to_string()
}

const fn default_true() -> bool {
    true
}

/// Filters for [`Sources::list`].
#[derive(Debug, Clone, Default)]
pub struct ListSourcesParams {
    /// 1-based page number
    pub page: Option<u64>,
    /// Items per page
    pub page_size: Option<u64>,
    /// Name or slug search
    pub search: Option<String>,
    /// Provider preset
    pub provider: Option<String>,
    /// Active state
    pub is_active: Option<bool>,
}

impl ListSourcesParams {
    fn to_request(&self) -> ApiRequest {
        ApiRequest::get(PATH)
            .with_optional_query("page", self.page)
            .with_optional_query("pageSize", self.page_size)
            .with_optional_query("search", self.search.as_deref())
            .with_optional_query("provider", self.provider.as_deref())
            .with_optional_query("isActive", self.is_active)
    }
}

/// Body of [`Sources::create`].
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceParams {
    /// Display name
    pub name: String,
    /// URL-safe identifier; derived from the name if omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Provider preset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Whether inbound signatures are checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_signature: Option<bool>,
    /// Deduplication strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_strategy: Option<String>,
    /// Deduplication window in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_window: Option<u64>,
    /// IP filter mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_filter_mode: Option<String>,
    /// Allowed client addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_allowlist: Option<Vec<String>>,
    /// Denied client addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_denylist: Option<Vec<String>>,
    /// Requests allowed per rate-limit window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u64>,
    /// Rate-limit window in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_window: Option<u64>,
}

impl CreateSourceParams {
    /// Creates parameters with only the required name set.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Body of [`Sources::update`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSourceParams {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether ingestion is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Whether inbound signatures are checked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify_signature: Option<bool>,
    /// Deduplication strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_strategy: Option<String>,
    /// Deduplication window in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup_window: Option<u64>,
    /// IP filter mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_filter_mode: Option<String>,
    /// Allowed client addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_allowlist: Option<Vec<String>>,
    /// Denied client addresses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_denylist: Option<Vec<String>>,
    /// Requests allowed per rate-limit window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u64>,
    /// Rate-limit window in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_window: Option<u64>,
}

/// The `/api/sources` namespace.
#[derive(Debug)]
pub struct Sources<'a, H, S> {
    transport: &'a Transport<H, S>,
}

impl<'a, H, S> Sources<'a, H, S> {
    pub(crate) const fn new(transport: &'a Transport<H, S>) -> Self {
        Self { transport }
    }
}

impl<H: HttpClient, S: Sleeper> Sources<'_, H, S> {
    /// Lists sources, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::Json`] on an unexpected body.
    pub async fn list(&self, params: &ListSourcesParams) -> Result<OffsetPage<Source>, Error> {
        OffsetPage::fetch(self.transport, params.to_request(), Some("sources")).await
    }

    /// Fetches one source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with kind `NotFound` for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Source, Error> {
        let body = self.transport.execute(&ApiRequest::get(item_path(id))).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "source"))?)
    }

    /// Creates a source. The returned value carries the signing secret.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with kind `Validation` for rejected parameters.
    pub async fn create(&self, params: &CreateSourceParams) -> Result<Source, Error> {
        let request = ApiRequest::post(PATH).with_body(serde_json::to_value(params)?);
        let body = self.transport.execute(&request).await?;
        Ok(serde_json::from_value(unwrap_envelope(body, "source"))?)
    }

    /// Updates the fields set in `params`.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn update(&self, id: &str, params: &UpdateSourceParams) -> Result<(), Error> {
        let request = ApiRequest::patch(item_path(id)).with_body(serde_json::to_value(params)?);
        self.transport.execute(&request).await?;
        Ok(())
    }

    /// Deletes a source.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.transport.execute(&ApiRequest::delete(item_path(id))).await?;
        Ok(())
    }

    /// Replaces the signing secret and returns the new one.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn rotate_secret(&self, id: &str) -> Result<String, Error> {
        let path = format!("{}/rotate-secret", item_path(id));
        let body = self.transport.execute(&ApiRequest::post(path)).await?;
        Ok(signing_secret(body.as_ref()))
    }

    /// Returns the current signing secret.
    ///
    /// # Errors
    ///
    /// Returns the transport error.
    pub async fn reveal_secret(&self, id: &str) -> Result<String, Error> {
        let path = format!("{}/reveal-secret", item_path(id));
        let body = self.transport.execute(&ApiRequest::get(path)).await?;
        Ok(signing_secret(body.as_ref()))
    }
}

fn item_path(id: &str) -> String {
    format!("{PATH}/{id}")
}

fn signing_secret(body: Option<&Value>) -> String {
    body.and_then(|b| b.get("signingSecret"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
