//! Page planning for the remote collection.
//!
//! The remote API exposes the collection through offset/limit paging.
//! Planning is separated from fetching so the request set is a pure
//! function of the collection size.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One bounded slice of the remote collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    /// Number of items to skip
    pub offset: i64,
    /// Maximum number of items the page may hold
    pub limit: i64,
}

/// Plans the page requests covering a collection of `total_count` items.
///
/// Offsets run `0, page_size, 2 * page_size, ...` strictly below
/// `total_count`, producing `ceil(total_count / page_size)` requests. A
/// non-positive `total_count` yields no requests.
pub fn plan_pages(total_count: i64, page_size: i64) -> Result<Vec<PageRequest>> {
    if page_size <= 0 {
        return Err(Error::InvalidPageSize(page_size));
    }

    let mut requests = Vec::new();
    let mut offset = 0;
    while offset < total_count {
        requests.push(PageRequest {
            offset,
            limit: page_size,
        });
        offset += page_size;
    }

    Ok(requests)
}
