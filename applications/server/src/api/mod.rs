/// API route modules
pub mod auth;
pub mod favorites;
pub mod health;
pub mod playlists;
pub mod songs;
pub mod stats;
pub mod users;

use serde::Deserialize;

/// Largest page size a listing will return
pub const MAX_PAGE_SIZE: u32 = 100;

/// `page` / `limit` query parameters shared by paginated listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageParams {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self { page, limit }
    }

    /// Page (from 1) and page size, falling back to `default_limit`
    pub fn resolve(&self, default_limit: u32) -> (u32, u32) {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_limit)
            .min(MAX_PAGE_SIZE);
        (page, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_defaults_and_clamp() {
        assert_eq!(PageParams::default().resolve(20), (1, 20));

        let params = PageParams {
            page: Some(0),
            limit: Some(1000),
        };
        assert_eq!(params.resolve(20), (1, MAX_PAGE_SIZE));

        let params = PageParams {
            page: Some(3),
            limit: Some(5),
        };
        assert_eq!(params.resolve(20), (3, 5));
    }
}
