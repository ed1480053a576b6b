//! Page results.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;

/// One page of a cursor-paginated query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    /// Records in arrival order.
    pub items: Vec<T>,

    /// Cursor for the next page, if the service reported one.
    pub next_cursor: Option<u64>,

    /// Total number of records in the collection, as reported by the service.
    pub total: u64,

    /// Whether another page is available.
    pub has_more: bool,
}

impl<T> PageResult<T> {
    /// A terminal page with no further records.
    pub fn last(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            next_cursor: None,
            total,
            has_more: false,
        }
    }
}

/// A page as it arrives on the wire, before normalisation.
///
/// Every field is optional so that an incomplete response can be detected
/// and handled instead of failing deserialisation outright.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct WirePage<T> {
    #[serde(default)]
    pub items: Option<Vec<T>>,
    #[serde(default)]
    pub next_cursor: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl<T> WirePage<T> {
    /// Normalise a wire page.
    ///
    /// The explicit `hasMore` field is authoritative; cursor presence is only
    /// consulted when the field is absent. A page claiming more results
    /// without a cursor is treated as the last page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedPage`] if the `items` field is missing.
    pub fn into_page(self) -> Result<PageResult<T>, Error> {
        let items = self.items.ok_or_else(|| Error::MalformedPage {
            reason: "missing items".to_string(),
        })?;

        let mut has_more = self.has_more.unwrap_or(self.next_cursor.is_some());
        if has_more && self.next_cursor.is_none() {
            warn!(
                items = items.len(),
                "page claims more results but carries no cursor, treating as last page"
            );
            has_more = false;
        }

        let total = self.total.unwrap_or(items.len() as u64);

        Ok(PageResult {
            items,
            next_cursor: self.next_cursor,
            total,
            has_more,
        })
    }
}
