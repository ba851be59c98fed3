//! Pagination helpers for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size if not specified
pub const DEFAULT_PAGE_SIZE: i64 = 25;
/// Maximum allowed page size
pub const MAX_PAGE_SIZE: i64 = 100;
/// Default page number (1-indexed)
pub const DEFAULT_PAGE: i64 = 1;

/// Pagination query parameters (`?page=&pageSize=`).
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Page number clamped to at least 1.
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    /// SQL LIMIT value
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL OFFSET value, saturating at `i64::MAX` for absurd page numbers.
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Pagination block returned under `meta.pagination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub page_count: i64,
}

impl PaginationMeta {
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        let page_size = params.limit();
        Self {
            page: params.page(),
            page_size,
            total,
            page_count: (total + page_size - 1) / page_size,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMeta {
    pub pagination: PaginationMeta,
}

/// List response wrapper: `{data, meta: {pagination}}`.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMeta,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, params: &PaginationParams, total: i64) -> Self {
        Self {
            data,
            meta: ResponseMeta {
                pagination: PaginationMeta::new(params, total),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params: PaginationParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 25);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_clamping() {
        let params = PaginationParams::new(0, 1000);
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), MAX_PAGE_SIZE);

        let params = PaginationParams::new(-3, 0);
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_huge_page_saturates() {
        let params = PaginationParams::new(i64::MAX, 10);
        assert_eq!(params.offset(), i64::MAX);

        let meta = PaginationMeta::new(&params, 30);
        assert_eq!(meta.page, i64::MAX);
        assert_eq!(meta.page_count, 3);
    }

    #[test]
    fn test_offset_and_page_count() {
        let params = PaginationParams::new(2, 10);
        assert_eq!(params.offset(), 10);

        let meta = PaginationMeta::new(&params, 30);
        assert_eq!(meta.page_count, 3);

        let meta = PaginationMeta::new(&params, 31);
        assert_eq!(meta.page_count, 4);

        let meta = PaginationMeta::new(&params, 0);
        assert_eq!(meta.page_count, 0);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let meta = PaginationMeta::new(&PaginationParams::new(1, 25), 3);
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["pageSize"], 25);
        assert_eq!(json["pageCount"], 1);
    }
}
