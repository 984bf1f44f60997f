//! Response types for HTTP handlers.

use authz_postgres::types::{OffsetPage, OffsetPagination};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod departments;
mod errors;
mod imports;
mod institution_users;
mod institutions;
mod monitors;
mod privileges;
mod roles;
mod vacations;

pub use departments::*;
pub use errors::*;
pub use imports::*;
pub use institution_users::*;
pub use institutions::*;
pub use monitors::*;
pub use privileges::*;
pub use roles::*;
pub use vacations::*;

/// Generic paginated response wrapper.
///
/// Offsets index into the filtered result set. `total` is present when the
/// listing counted matching rows.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "{T}sPage")]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items in this page.
    pub items: Vec<T>,
    /// Total count of items matching the query (if requested).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    /// Number of skipped items.
    pub offset: i64,
    /// Maximum number of items in this page.
    pub limit: i64,
}

impl<T> Page<T> {
    /// Creates an empty page with no items.
    pub fn empty(pagination: OffsetPagination) -> Self {
        Self {
            items: Vec::new(),
            total: Some(0),
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }

    /// Returns true if items exist past this page.
    pub fn has_more(&self) -> bool {
        self.total
            .is_some_and(|total| self.offset + (self.items.len() as i64) < total)
    }

    /// Creates a page from an offset page, mapping items using the provided function.
    pub fn from_offset_page<M, F>(page: OffsetPage<M>, pagination: OffsetPagination, f: F) -> Self
    where
        F: FnMut(M) -> T,
    {
        Self {
            items: page.items.into_iter().map(f).collect(),
            total: page.total,
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }
}
