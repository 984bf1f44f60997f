#[cfg(feature = "schema")]
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Largest page a list query returns.
pub const MAX_LIMIT: i64 = 1000;

const DEFAULT_LIMIT: i64 = 50;

/// `LIMIT`/`OFFSET` window of a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub struct OffsetPagination {
    pub limit: i64,
    pub offset: i64,
    /// Also count every matching row.
    #[serde(default)]
    pub include_count: bool,
}

impl OffsetPagination {
    /// Clamps `limit` to `1..=MAX_LIMIT` and `offset` to non-negative values.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
            include_count: false,
        }
    }

    pub fn with_count(self) -> Self {
        Self {
            include_count: true,
            ..self
        }
    }

    /// The window right after this one.
    pub fn next_page(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            ..self
        }
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, 0)
    }
}

/// Rows of one window plus, when requested, the number of all matches.
#[derive(Debug, Clone)]
pub struct OffsetPage<T> {
    pub items: Vec<T>,
    pub total: Option<i64>,
}

impl<T> OffsetPage<T> {
    pub fn new(items: Vec<T>, total: Option<i64>) -> Self {
        Self { items, total }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> OffsetPage<U> {
        OffsetPage {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }

    /// Whether the window was filled, i.e. more rows may follow.
    pub fn is_full(&self, pagination: &OffsetPagination) -> bool {
        self.items.len() as i64 >= pagination.limit
    }

    /// Whether rows remain after this window; unknown without a count.
    pub fn has_more(&self, pagination: &OffsetPagination) -> Option<bool> {
        let seen = pagination.offset + self.items.len() as i64;
        self.total.map(|total| seen < total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_clamped() {
        assert_eq!(OffsetPagination::new(5000, -3), OffsetPagination::new(MAX_LIMIT, 0));
        assert_eq!(OffsetPagination::new(0, 10).limit, 1);
        assert_eq!(OffsetPagination::default().limit, 50);
    }

    #[test]
    fn next_page_advances_by_limit() {
        let page = OffsetPagination::new(20, 0).with_count().next_page().next_page();
        assert_eq!(page.offset, 40);
        assert!(page.include_count);
    }

    #[test]
    fn remaining_rows() {
        let window = OffsetPagination::new(2, 0).with_count();
        let page = OffsetPage::new(vec![1, 2], Some(5));
        assert_eq!(page.has_more(&window), Some(true));
        assert!(page.is_full(&window));

        let window = OffsetPagination::new(2, 4);
        let last = OffsetPage::new(vec![5], Some(5)).map(|n| n * 2);
        assert_eq!(last.items, [10]);
        assert_eq!(last.has_more(&window), Some(false));
        assert!(!last.is_full(&window));

        let uncounted: OffsetPage<i32> = OffsetPage::new(Vec::new(), None);
        assert_eq!(uncounted.has_more(&window), None);
    }
}
