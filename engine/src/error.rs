//! Error types for the Stocksync engine.

use thiserror::Error;

/// All possible errors from the Stocksync engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A remote item whose display-name field is absent, non-string, or
    /// empty. Recorded per item; never aborts a pass.
    #[error("Invalid or missing {0} in external item")]
    InvalidItemField(&'static str),

    #[error("page size must be positive, got {0}")]
    InvalidPageSize(i64),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
