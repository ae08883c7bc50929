//! Cursor-following page retrieval.
//!
//! The WAPI pages large result sets behind an opaque continuation token:
//! the initial request carries the query and the paging flags, every
//! follow-up carries only the token from the previous response, and the
//! final page omits the token. [`fetch_all`] reassembles the pages into one
//! sequence in request order.
//!
//! Page retrieval goes through the [`PageFetcher`] trait so the loop (and
//! everything built on it) can be driven by scripted pages in tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, WapiError};

/// A single fragment of a paged WAPI response.
///
/// Transient: consumed immediately into the running result sequence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page {
    /// Raw entries of this page.
    #[serde(default)]
    pub result: Vec<Value>,
    /// Continuation token; absent on the final page.
    #[serde(default)]
    pub next_page_id: Option<String>,
}

/// Filters and requested fields for the initial request of a paged query.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    /// Comma-separated `_return_fields` value.
    pub return_fields: String,
    /// Additional `key=value` filters (`zone`, `view`, `type`).
    pub filters: Vec<(String, String)>,
}

impl PageQuery {
    /// A query requesting the given return fields and no filters.
    pub fn new(return_fields: impl Into<String>) -> Self {
        Self {
            return_fields: return_fields.into(),
            filters: Vec::new(),
        }
    }

    /// Add a `key=value` filter.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

/// Source of pages for paged WAPI objects.
///
/// The initial request carries the query; follow-ups carry only the cursor
/// returned by the previous page. [`WapiSession`](crate::WapiSession) is the
/// live implementation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue the initial request of a paged query.
    async fn first_page(&self, object: &str, query: &PageQuery) -> Result<Page>;

    /// Follow the continuation token from a previous page.
    async fn next_page(&self, object: &str, page_id: &str) -> Result<Page>;
}

/// Retrieve every page of `object` and concatenate the `result` arrays in
/// request order.
///
/// Terminates exactly when a response omits the continuation token. An
/// endpoint that legitimately matches nothing yields an empty sequence, not
/// an error; only failures surfaced by the fetcher propagate.
pub async fn fetch_all<F>(fetcher: &F, object: &str, query: &PageQuery) -> Result<Vec<Value>>
where
    F: PageFetcher + ?Sized,
{
    let mut page = fetcher.first_page(object, query).await?;
    let mut entries = page.result;

    while let Some(page_id) = page.next_page_id {
        page = fetcher.next_page(object, &page_id).await?;
        entries.extend(page.result);
    }

    Ok(entries)
}

/// Typed variant of [`fetch_all`]: deserializes every entry into `T`.
pub async fn fetch_all_as<T, F>(fetcher: &F, object: &str, query: &PageQuery) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: PageFetcher + ?Sized,
{
    fetch_all(fetcher, object, query)
        .await?
        .into_iter()
        .map(|entry| {
            serde_json::from_value(entry).map_err(|e| WapiError::Parse {
                object: object.to_string(),
                detail: e.to_string(),
            })
        })
        .collect()
}
