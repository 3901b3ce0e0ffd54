//! Relational schema for the row side of the bridge
//!
//! Table definitions describe the fixed-schema rows handed over by the
//! relational engine: column order, declared types and flags, and the key
//! part layout of each index.

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::TableCatalog;
pub use types::{ColumnType, FieldDef, IndexDef, TableDef};
