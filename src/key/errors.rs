//! Key and range translation error types
//!
//! Error codes:
//! - BRIDGE_INDEX_NOT_FOUND
//! - BRIDGE_KEY_PART_INVALID
//! - BRIDGE_KEY_BUFFER_TRUNCATED

use std::fmt;

/// Key-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyErrorCode {
    /// Index ordinal out of range, or the table has no indexes
    BridgeIndexNotFound,
    /// Key part descriptor violates width rules
    BridgeKeyPartInvalid,
    /// Key buffer ends before a part flagged present
    BridgeKeyBufferTruncated,
}

impl KeyErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            KeyErrorCode::BridgeIndexNotFound => "BRIDGE_INDEX_NOT_FOUND",
            KeyErrorCode::BridgeKeyPartInvalid => "BRIDGE_KEY_PART_INVALID",
            KeyErrorCode::BridgeKeyBufferTruncated => "BRIDGE_KEY_BUFFER_TRUNCATED",
        }
    }
}

impl fmt::Display for KeyErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Key error with context
#[derive(Debug, Clone)]
pub struct KeyError {
    code: KeyErrorCode,
    message: String,
}

impl KeyError {
    /// Create an index not found error
    pub fn index_not_found(ordinal: usize, index_count: usize) -> Self {
        Self {
            code: KeyErrorCode::BridgeIndexNotFound,
            message: format!(
                "Index ordinal {} not found (table declares {} indexes)",
                ordinal, index_count
            ),
        }
    }

    /// Create an invalid key part error
    pub fn invalid_part(field: &str, reason: impl Into<String>) -> Self {
        Self {
            code: KeyErrorCode::BridgeKeyPartInvalid,
            message: format!("Key part '{}': {}", field, reason.into()),
        }
    }

    /// Create a truncated buffer error
    pub fn buffer_truncated(field: &str, needed: usize, available: usize) -> Self {
        Self {
            code: KeyErrorCode::BridgeKeyBufferTruncated,
            message: format!(
                "Key part '{}' needs {} bytes, buffer has {}",
                field, needed, available
            ),
        }
    }

    pub fn code(&self) -> KeyErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ERROR] {}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for KeyError {}

/// Result type for key operations
pub type KeyResult<T> = Result<T, KeyError>;
