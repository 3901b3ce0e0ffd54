//! Schema error types
//!
//! Error codes:
//! - BRIDGE_SCHEMA_MALFORMED (FATAL)
//! - BRIDGE_UNKNOWN_TABLE (REJECT)
//! - BRIDGE_TABLE_EXISTS (REJECT)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected
    Reject,
    /// Catalog cannot be used
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Table definition file unreadable or structurally invalid
    BridgeSchemaMalformed,
    /// Table not present in the catalog
    BridgeUnknownTable,
    /// Table already registered
    BridgeTableExists,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::BridgeSchemaMalformed => "BRIDGE_SCHEMA_MALFORMED",
            SchemaErrorCode::BridgeUnknownTable => "BRIDGE_UNKNOWN_TABLE",
            SchemaErrorCode::BridgeTableExists => "BRIDGE_TABLE_EXISTS",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::BridgeSchemaMalformed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with context
#[derive(Debug)]
pub struct SchemaError {
    code: SchemaErrorCode,
    message: String,
    table: Option<String>,
}

impl SchemaError {
    /// Create an error for a malformed definition
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::BridgeSchemaMalformed,
            message: format!("Malformed table definition '{}': {}", source.into(), reason.into()),
            table: None,
        }
    }

    /// Create an unknown table error
    pub fn unknown_table(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::BridgeUnknownTable,
            message: format!("Table '{}' not found", table),
            table: Some(table),
        }
    }

    /// Create a duplicate table error
    pub fn table_exists(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            code: SchemaErrorCode::BridgeTableExists,
            message: format!("Table '{}' is already registered", table),
            table: Some(table),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code.severity(), self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
