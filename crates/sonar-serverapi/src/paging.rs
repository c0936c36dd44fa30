//! Paging descriptor shared by the paginated endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(rename = "pageIndex", default)]
    pub page_index: i64,
    #[serde(rename = "pageSize", default)]
    pub page_size: i64,
    #[serde(default)]
    pub total: i64,
}

impl Paging {
    /// Number of pages needed to cover `total` items.
    pub fn total_pages(&self) -> i64 {
        if self.page_size <= 0 {
            return 0;
        }
        (self.total as f64 / self.page_size as f64).ceil() as i64
    }
}
