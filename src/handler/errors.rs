//! Handler errors

use thiserror::Error;

use crate::codec::CodecError;
use crate::key::KeyError;
use crate::store::StoreError;

/// Result type for handler operations
pub type HandlerResult<T> = Result<T, HandlerError>;

/// Errors surfaced to the relational engine
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid table definition: {0}")]
    InvalidTable(String),

    /// Scan exhausted
    #[error("End of data")]
    EndOfData,

    /// Lookup matched nothing
    #[error("Key not found")]
    KeyNotFound,

    /// Positioned operation without a current row
    #[error("No current row")]
    NoCurrentRow,

    #[error("No active index")]
    NoActiveIndex,

    #[error("No active scan")]
    NoActiveScan,
}

impl HandlerError {
    /// End of data and key not found are normal scan outcomes
    pub fn is_not_found(&self) -> bool {
        matches!(self, HandlerError::EndOfData | HandlerError::KeyNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;

    #[test]
    fn test_from_conversions() {
        let err: HandlerError = CodecError::type_unsupported("f", "json").into();
        assert!(matches!(&err, HandlerError::Codec(e) if e.code() == CodecErrorCode::BridgeTypeUnsupported));
        assert!(err.to_string().contains("BRIDGE_TYPE_UNSUPPORTED"));

        let err: HandlerError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, HandlerError::Store(_)));
    }

    #[test]
    fn test_not_found_outcomes() {
        assert!(HandlerError::EndOfData.is_not_found());
        assert!(HandlerError::KeyNotFound.is_not_found());
        assert!(!HandlerError::NoCurrentRow.is_not_found());
    }
}
