/// Errors from object store operations.
///
/// A missing key is not an error; lookups report it as `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend is reachable but refused or failed the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
