//! Offset pagination request type.

use authz_postgres::types::{MAX_LIMIT, OffsetPagination};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// `?offset=&limit=` of list endpoints.
///
/// Listings always carry the total count so clients can render page numbers
/// without a second request.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Rows to skip; `0` when absent.
    #[validate(range(max = 100_000))]
    pub offset: Option<u32>,

    /// Rows to return; `50` when absent.
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<u32>,
}

impl Pagination {
    pub fn new(offset: u32, limit: u32) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    pub fn offset(&self) -> u32 {
        self.offset.unwrap_or_default()
    }

    pub fn limit(&self) -> u32 {
        self.limit.map_or(50, |limit| limit.min(MAX_LIMIT as u32))
    }
}

impl From<Pagination> for OffsetPagination {
    fn from(pagination: Pagination) -> Self {
        Self::new(pagination.limit().into(), pagination.offset().into()).with_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let pagination = Pagination::default();
        assert_eq!(pagination.offset(), 0);
        assert_eq!(pagination.limit(), 50);

        let query: OffsetPagination = pagination.into();
        assert_eq!(query.limit, 50);
        assert!(query.include_count);
    }

    #[test]
    fn out_of_range_limit_fails_validation() {
        assert!(Pagination::new(0, 5000).validate().is_err());
        assert!(Pagination::new(20, 10).validate().is_ok());
    }
}
