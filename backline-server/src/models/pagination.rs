//! Pagination types
//!
//! Query: `?page=N&limit=M`. Responses carry `totalCount`, `totalPages`,
//! `hasNext` and `hasPrev` alongside the items.

use serde::{Deserialize, Serialize};

/// Maximum items per page
const MAX_LIMIT: u32 = 100;

/// Default items per page
const DEFAULT_LIMIT: u32 = 20;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page (max 100)
    pub limit: u32,
}

impl Pagination {
    /// Create pagination with validation.
    ///
    /// - Page is clamped to minimum of 1
    /// - Limit is clamped to 1..=100
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }

    /// SQL LIMIT value.
    pub fn limit(&self) -> u32 {
        self.limit
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results as returned by a repository
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total_count: i64,
    pub page: Pagination,
}

impl<T> Paginated<T> {
    pub fn empty(page: Pagination) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page,
        }
    }

    /// Total number of pages; an empty result still has one page.
    pub fn total_pages(&self) -> u32 {
        let total = self.total_count.max(0) as u64;
        let limit = self.page.limit as u64;
        total.div_ceil(limit).clamp(1, u32::MAX as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page.page > 1
    }

    /// Convert items, keeping the counts.
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
        }
    }
}

/// JSON envelope for a page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> From<Paginated<T>> for PageResponse<T> {
    fn from(p: Paginated<T>) -> Self {
        Self {
            page: p.page.page,
            limit: p.page.limit,
            total_count: p.total_count,
            total_pages: p.total_pages(),
            has_next: p.has_next(),
            has_prev: p.has_prev(),
            items: p.items,
        }
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self::new(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(DEFAULT_LIMIT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_of(total: i64, page: u32, limit: u32) -> Paginated<()> {
        Paginated {
            items: vec![],
            total_count: total,
            page: Pagination::new(page, limit),
        }
    }

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::new(1, 10).offset(), 0);
        assert_eq!(Pagination::new(2, 10).offset(), 10);
        assert_eq!(Pagination::new(3, 25).offset(), 50);
    }

    #[test]
    fn offset_does_not_overflow() {
        let p = Pagination::new(u32::MAX, 100);
        assert_eq!(p.offset(), (u32::MAX as u64 - 1) * 100);
    }

    #[test]
    fn clamps_inputs() {
        assert_eq!(Pagination::new(0, 10).page, 1);
        assert_eq!(Pagination::new(1, 0).limit, 1);
        assert_eq!(Pagination::new(1, 999).limit, 100);
    }

    #[test]
    fn defaults_from_params() {
        let p = Pagination::from(PaginationParams::default());
        assert_eq!(p, Pagination { page: 1, limit: 20 });
    }

    #[test]
    fn total_pages() {
        assert_eq!(page_of(0, 1, 10).total_pages(), 1);
        assert_eq!(page_of(25, 1, 10).total_pages(), 3);
        assert_eq!(page_of(100, 1, 10).total_pages(), 10);
    }

    #[test]
    fn has_next_prev() {
        let first = page_of(30, 1, 10);
        assert!(first.has_next());
        assert!(!first.has_prev());

        let middle = page_of(30, 2, 10);
        assert!(middle.has_next());
        assert!(middle.has_prev());

        let last = page_of(30, 3, 10);
        assert!(!last.has_next());
        assert!(last.has_prev());
    }

    #[test]
    fn envelope_uses_camel_case() {
        let response = PageResponse::from(page_of(45, 2, 20).map(|_| 1));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["totalCount"], 45);
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["hasNext"], true);
        assert_eq!(json["hasPrev"], true);
        assert_eq!(json["limit"], 20);
    }
}
