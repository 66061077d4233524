use serde::{Deserialize, Serialize};

/// Where in the result set the client currently is.
///
/// `offset` is the offset of the *next* page to request; it only ever grows in
/// steps of `limit` until the window is reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationWindow {
    pub offset: usize,
    pub limit: usize,
    pub has_more: bool,
    pub total: usize,
}

impl PaginationWindow {
    pub fn reset(limit: usize) -> Self {
        Self {
            offset: 0,
            limit,
            has_more: true,
            total: 0,
        }
    }

    pub fn advance(window: PaginationWindow, returned: usize, total: usize) -> Self {
        Self {
            offset: window.offset + window.limit,
            limit: window.limit,
            has_more: window.offset + returned < total,
            total,
        }
    }
}
