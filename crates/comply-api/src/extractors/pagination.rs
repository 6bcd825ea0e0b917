//! Pagination query parameters
//!
//! Offset-based pagination shared by all list endpoints.

use serde::Deserialize;

/// Default page size when the caller omits `limit`
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size
pub const MAX_LIMIT: i64 = 100;

/// Offset-based pagination query parameters
///
/// Used with `Query<PaginationParams>`; out-of-range values are clamped
/// rather than rejected.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Effective limit, clamped to `1..=MAX_LIMIT`
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Effective offset, never negative
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}
