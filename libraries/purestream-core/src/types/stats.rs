//! Aggregate counters and pagination metadata
use serde::{Deserialize, Serialize};

/// Collection sizes shown on the landing page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub users: i64,
    pub songs: i64,
    pub playlists: i64,
}

/// Page metadata returned by paginated listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    /// Build pagination metadata; `pages` is `ceil(total / limit)`
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages: (total + limit_i - 1) / limit_i,
        }
    }

    /// Row offset of the first item on this page (pages start at 1)
    pub fn offset(page: u32, limit: u32) -> i64 {
        i64::from(page.max(1) - 1) * i64::from(limit)
    }
}
