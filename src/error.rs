//! Error taxonomy shared by the query service and the client controller.
//!
//! Server-side faults (`InvalidArgument`, `StorageUnavailable`) are reported to
//! the client as a failure response. `NetworkFailure` only ever originates on the
//! client side and drives the controller into its `Error` state.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Malformed offset/limit, rejected before the collection is touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The book collection could not be queried.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Transport error, non-success status or a `success: false` body.
    #[error("network failure: {0}")]
    NetworkFailure(String),
}

impl SearchError {
    /// Short machine-friendly label used in failure responses.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidArgument(_) => "invalid_argument",
            SearchError::StorageUnavailable(_) => "storage_unavailable",
            SearchError::NetworkFailure(_) => "network_failure",
        }
    }
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
