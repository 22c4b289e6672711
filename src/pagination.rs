//! Offset and cursor pages returned by list endpoints.
//!
//! A page keeps the request that produced it, so its successor is fetched by
//! replaying that request with the next `page` or `cursor` parameter.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::Error;
use crate::time::Sleeper;
use crate::transport::{ApiRequest, HttpClient, Transport};

/// Page number assumed when the response carries none.
pub const DEFAULT_PAGE: u64 = 1;

/// Page size assumed when the response carries none.
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// One page of an offset-paginated listing.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// 1-based page number.
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
    request: ApiRequest,
    data_key: Option<&'static str>,
}

impl<T: DeserializeOwned> OffsetPage<T> {
    /// Fetches the page described by `request`.
    ///
    /// Items are read from `data_key` if present, else from `data`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::Json`] if an item does not
    /// deserialize into `T`.
    pub async fn fetch<H: HttpClient, S: Sleeper>(
        transport: &Transport<H, S>,
        request: ApiRequest,
        data_key: Option<&'static str>,
    ) -> Result<Self, Error> {
        let body = transport.execute(&request).await?;
        Self::from_body(body, request, data_key)
    }

    /// Builds a page from an already fetched response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if an item does not deserialize into `T`.
    pub fn from_body(
        body: Option<Value>,
        request: ApiRequest,
        data_key: Option<&'static str>,
    ) -> Result<Self, Error> {
        let empty = Map::new();
        let object = body.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let pagination = object.get("pagination").and_then(Value::as_object).unwrap_or(&empty);

        let items = data_key
            .and_then(|key| object.get(key))
            .or_else(|| object.get("data"));

        Ok(Self {
            data: parse_items(items)?,
            total: number(pagination, &["total"]).unwrap_or(0),
            page: number(pagination, &["page"]).unwrap_or(DEFAULT_PAGE),
            page_size: number(pagination, &["pageSize", "page_size"]).unwrap_or(DEFAULT_PAGE_SIZE),
            request,
            data_key,
        })
    }

    /// Returns true if items remain past this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.page.saturating_mul(self.page_size) < self.total
    }

    /// Fetches the following page.
    ///
    /// # Errors
    ///
    /// As [`fetch`](Self::fetch).
    pub async fn next_page<H: HttpClient, S: Sleeper>(
        &self,
        transport: &Transport<H, S>,
    ) -> Result<Self, Error> {
        let request = replace_query(self.request.clone(), "page", Some(self.page + 1));
        Self::fetch(transport, request, self.data_key).await
    }

    /// Drains this page and every following one into a single list.
    ///
    /// Stops early if a page comes back empty.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while fetching a page.
    pub async fn collect_all<H: HttpClient, S: Sleeper>(
        self,
        transport: &Transport<H, S>,
    ) -> Result<Vec<T>, Error> {
        let mut page = self;
        let mut items = Vec::new();
        loop {
            let next = if page.has_more() && !page.data.is_empty() {
                Some(page.next_page(transport).await?)
            } else {
                None
            };
            items.append(&mut page.data);
            match next {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Whether the server reports more items.
    pub has_more: bool,
    /// Opaque cursor for the following page.
    pub next_cursor: Option<String>,
    request: ApiRequest,
}

impl<T: DeserializeOwned> CursorPage<T> {
    /// Fetches the page described by `request`.
    ///
    /// # Errors
    ///
    /// Returns the transport error, or [`Error::Json`] if an item does not
    /// deserialize into `T`.
    pub async fn fetch<H: HttpClient, S: Sleeper>(
        transport: &Transport<H, S>,
        request: ApiRequest,
    ) -> Result<Self, Error> {
        let body = transport.execute(&request).await?;
        Self::from_body(body, request)
    }

    /// Builds a page from an already fetched response body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if an item does not deserialize into `T`.
    pub fn from_body(body: Option<Value>, request: ApiRequest) -> Result<Self, Error> {
        let empty = Map::new();
        let object = body.as_ref().and_then(Value::as_object).unwrap_or(&empty);
        let pagination = object.get("pagination").and_then(Value::as_object).unwrap_or(&empty);

        let has_more = first(pagination, &["hasMore", "has_more"])
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let next_cursor = first(pagination, &["nextCursor", "next_cursor"])
            .and_then(Value::as_str)
            .map(ToString::to_string);

        Ok(Self {
            data: parse_items(object.get("data"))?,
            has_more,
            next_cursor,
            request,
        })
    }

    /// Fetches the following page.
    ///
    /// # Errors
    ///
    /// As [`fetch`](Self::fetch).
    pub async fn next_page<H: HttpClient, S: Sleeper>(
        &self,
        transport: &Transport<H, S>,
    ) -> Result<Self, Error> {
        let request = replace_query(self.request.clone(), "cursor", self.next_cursor.as_deref());
        Self::fetch(transport, request).await
    }

    /// Drains this page and every following one into a single list.
    ///
    /// Stops when the server reports no more items or omits the cursor.
    ///
    /// # Errors
    ///
    /// Returns the first error hit while fetching a page.
    pub async fn collect_all<H: HttpClient, S: Sleeper>(
        self,
        transport: &Transport<H, S>,
    ) -> Result<Vec<T>, Error> {
        let mut page = self;
        let mut items = Vec::new();
        loop {
            let next = if page.has_more && page.next_cursor.is_some() {
                Some(page.next_page(transport).await?)
            } else {
                None
            };
            items.append(&mut page.data);
            match next {
                Some(next) => page = next,
                None => return Ok(items),
            }
        }
    }
}

fn parse_items<T: DeserializeOwned>(items: Option<&Value>) -> Result<Vec<T>, Error> {
    match items {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| T::deserialize(item).map_err(Error::from))
            .collect(),
        _ => Ok(Vec::new()),
    }
}

fn first<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn number(object: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    first(object, keys).and_then(Value::as_u64)
}

fn replace_query(mut request: ApiRequest, key: &str, value: Option<impl ToString>) -> ApiRequest {
    request.query.retain(|(k, _)| k != key);
    request.with_optional_query(key, value)
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
