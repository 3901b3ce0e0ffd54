//! Codec error types
//!
//! Error codes:
//! - BRIDGE_TYPE_UNSUPPORTED
//! - BRIDGE_FIELD_TOO_LARGE
//! - BRIDGE_DECIMAL_INVALID
//! - BRIDGE_VALUE_INVALID
//!
//! All codec errors are field-level: the caller surfaces them against the
//! named field and discards the partially built row or document.

use std::fmt;

/// Codec-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorCode {
    /// Column type or document variant has no mapping
    BridgeTypeUnsupported,
    /// Variable-length value at or above the size ceiling
    BridgeFieldTooLarge,
    /// Decimal precision/scale negative, or text not a decimal
    BridgeDecimalInvalid,
    /// Value cannot be represented in the target field
    BridgeValueInvalid,
}

impl CodecErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            CodecErrorCode::BridgeTypeUnsupported => "BRIDGE_TYPE_UNSUPPORTED",
            CodecErrorCode::BridgeFieldTooLarge => "BRIDGE_FIELD_TOO_LARGE",
            CodecErrorCode::BridgeDecimalInvalid => "BRIDGE_DECIMAL_INVALID",
            CodecErrorCode::BridgeValueInvalid => "BRIDGE_VALUE_INVALID",
        }
    }
}

impl fmt::Display for CodecErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Codec error with the offending field
#[derive(Debug, Clone)]
pub struct CodecError {
    code: CodecErrorCode,
    field: String,
    message: String,
}

impl CodecError {
    /// Create a type unsupported error
    pub fn type_unsupported(field: impl Into<String>, type_name: &str) -> Self {
        Self {
            code: CodecErrorCode::BridgeTypeUnsupported,
            field: field.into(),
            message: format!("type '{}' has no mapping", type_name),
        }
    }

    /// Create a field too large error
    pub fn field_too_large(field: impl Into<String>, length: usize, ceiling: usize) -> Self {
        Self {
            code: CodecErrorCode::BridgeFieldTooLarge,
            field: field.into(),
            message: format!(
                "length {} exceeds maximum {}",
                length,
                ceiling.saturating_sub(1)
            ),
        }
    }

    /// Create an invalid decimal error
    pub fn decimal_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: CodecErrorCode::BridgeDecimalInvalid,
            field: field.into(),
            message: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn value_invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: CodecErrorCode::BridgeValueInvalid,
            field: field.into(),
            message: reason.into(),
        }
    }

    pub fn code(&self) -> CodecErrorCode {
        self.code
    }

    /// Name of the field being converted
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ERROR] {}: field '{}': {}",
            self.code.code(),
            self.field,
            self.message
        )
    }
}

impl std::error::Error for CodecError {}

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;
