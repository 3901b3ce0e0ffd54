//! Store boundary errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures reported by the document store.
///
/// Propagated unchanged; never retried by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Normal cursor exhaustion
    #[error("End of cursor")]
    EndOfCursor,

    /// Cursor has not been advanced yet
    #[error("Cursor has no current document")]
    NoCurrentDocument,

    /// Failure reported by the store itself
    #[error("Store error {code}: {message}")]
    Backend { code: i32, message: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn backend(code: i32, message: impl Into<String>) -> Self {
        StoreError::Backend {
            code,
            message: message.into(),
        }
    }

    /// Whether this is cursor exhaustion rather than a failure
    pub fn is_end_of_cursor(&self) -> bool {
        matches!(self, StoreError::EndOfCursor)
    }
}
