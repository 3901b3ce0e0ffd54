//! Relational table definitions
//!
//! Column types mirror the relational engine's field types. Types without a
//! document mapping (bit, enum, set, json, geometry) are still declarable so
//! that encode can refuse them explicitly.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::key::KeyPart;

/// Declared relational column type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnType {
    /// 8-bit integer
    Tiny,
    /// 16-bit integer
    Short,
    /// 24-bit integer
    Int24,
    /// 32-bit integer
    Long,
    /// 64-bit integer
    LongLong,
    /// Calendar year
    Year,
    /// Single precision real
    Float,
    /// Double precision real
    Double,
    /// Time of day, exchanged as the real HHMMSS.ffffff
    Time,
    /// Exact decimal with declared precision and scale
    Decimal { precision: i32, scale: i32 },
    /// Fixed-length text
    Char,
    /// Variable-length text
    Varchar,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    /// Calendar date without time
    Date,
    /// Calendar date and wall-clock time
    DateTime,
    /// Epoch-based timestamp with fractional seconds
    Timestamp,
    /// Always-null column
    Null,
    Bit,
    Enum,
    Set,
    Json,
    Geometry,
}

impl ColumnType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Tiny => "tinyint",
            ColumnType::Short => "smallint",
            ColumnType::Int24 => "mediumint",
            ColumnType::Long => "int",
            ColumnType::LongLong => "bigint",
            ColumnType::Year => "year",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::Time => "time",
            ColumnType::Decimal { .. } => "decimal",
            ColumnType::Char => "char",
            ColumnType::Varchar => "varchar",
            ColumnType::TinyBlob => "tinyblob",
            ColumnType::Blob => "blob",
            ColumnType::MediumBlob => "mediumblob",
            ColumnType::LongBlob => "longblob",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Null => "null",
            ColumnType::Bit => "bit",
            ColumnType::Enum => "enum",
            ColumnType::Set => "set",
            ColumnType::Json => "json",
            ColumnType::Geometry => "geometry",
        }
    }

    /// Storage width in bits for integer types
    pub fn integer_bits(&self) -> Option<u32> {
        match self {
            ColumnType::Tiny => Some(8),
            ColumnType::Short => Some(16),
            ColumnType::Int24 => Some(24),
            ColumnType::Long => Some(32),
            ColumnType::LongLong => Some(64),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.integer_bits().is_some() || matches!(self, ColumnType::Year)
    }

    /// Variable-length text and blob types
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            ColumnType::Char
                | ColumnType::Varchar
                | ColumnType::TinyBlob
                | ColumnType::Blob
                | ColumnType::MediumBlob
                | ColumnType::LongBlob
        )
    }

    /// Inclusive value range of an integer column.
    pub fn integer_range(&self, unsigned: bool) -> Option<(i128, i128)> {
        if matches!(self, ColumnType::Year) {
            return Some((0, 2155));
        }
        let bits = self.integer_bits()?;
        if unsigned {
            Some((0, (1_i128 << bits) - 1))
        } else {
            Some((-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1))
        }
    }
}

/// Column definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Column name, used as the document field name
    pub name: String,
    /// Declared column type
    #[serde(flatten)]
    pub column_type: ColumnType,
    /// Whether the column accepts NULL
    #[serde(default)]
    pub nullable: bool,
    /// Unsigned flag for numeric columns
    #[serde(default)]
    pub unsigned: bool,
    /// Binary flag for text/blob columns
    #[serde(default)]
    pub binary: bool,
    /// Declared length for char/varchar (0 = unbounded); characters, or
    /// bytes for binary columns
    #[serde(default)]
    pub length: u32,
}

impl FieldDef {
    /// Create a NOT NULL signed column
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            unsigned: false,
            binary: false,
            length: 0,
        }
    }

    /// Mark the column nullable
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Mark the column unsigned
    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    /// Mark the column binary
    pub fn binary(mut self) -> Self {
        self.binary = true;
        self
    }

    /// Set the declared length
    pub fn with_length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }
}

/// Index definition: an ordered list of key parts.
///
/// `parts` is `None` when the engine supplied no key part descriptor; range
/// translation then matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    pub name: String,
    #[serde(default)]
    pub parts: Option<Vec<KeyPart>>,
}

impl IndexDef {
    pub fn new(name: impl Into<String>, parts: Vec<KeyPart>) -> Self {
        Self {
            name: name.into(),
            parts: Some(parts),
        }
    }

    /// An index without a key part descriptor
    pub fn without_parts(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: None,
        }
    }
}

/// Complete table definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    /// Table name, also the share registry key
    pub name: String,
    /// Columns in row order
    pub fields: Vec<FieldDef>,
    /// Indexes by ordinal
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            fields,
            indexes: Vec::new(),
        }
    }

    /// Adds an index
    pub fn with_index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Position of a column by name
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Validates the definition itself (not a row)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err(format!("Table '{}' declares no fields", self.name));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(format!("Duplicate field '{}'", field.name));
            }
            if let ColumnType::Decimal { precision, scale } = field.column_type {
                if precision < 0 || scale < 0 {
                    return Err(format!(
                        "Field '{}' has negative decimal precision or scale",
                        field.name
                    ));
                }
            }
        }

        for index in &self.indexes {
            for part in index.parts.iter().flatten() {
                if !seen.contains(part.field.as_str()) {
                    return Err(format!(
                        "Index '{}' references unknown field '{}'",
                        index.name, part.field
                    ));
                }
                part.check().map_err(|e| format!("Index '{}': {}", index.name, e))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyKind;

    fn sample_table() -> TableDef {
        TableDef::new(
            "users",
            vec![
                FieldDef::new("id", ColumnType::Long),
                FieldDef::new("name", ColumnType::Varchar).nullable().with_length(64),
            ],
        )
    }

    #[test]
    fn test_table_structure_valid() {
        let table = sample_table();
        assert!(table.validate_structure().is_ok());
        assert_eq!(table.field_index("name"), Some(1));
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let mut table = sample_table();
        table.fields.push(FieldDef::new("id", ColumnType::Short));
        let result = table.validate_structure();
        assert!(result.unwrap_err().contains("Duplicate"));
    }

    #[test]
    fn test_index_unknown_field_rejected() {
        let part = KeyPart::new("missing", KeyKind::SignedInt, 4, false).unwrap();
        let table = sample_table().with_index(IndexDef::new("idx", vec![part]));
        assert!(table.validate_structure().unwrap_err().contains("missing"));
    }

    #[test]
    fn test_negative_decimal_rejected() {
        let table = TableDef::new(
            "t",
            vec![FieldDef::new(
                "d",
                ColumnType::Decimal {
                    precision: -1,
                    scale: 2,
                },
            )],
        );
        assert!(table.validate_structure().is_err());
    }

    #[test]
    fn test_integer_ranges() {
        assert_eq!(ColumnType::Tiny.integer_range(false), Some((-128, 127)));
        assert_eq!(ColumnType::Tiny.integer_range(true), Some((0, 255)));
        assert_eq!(
            ColumnType::Int24.integer_range(false),
            Some((-8_388_608, 8_388_607))
        );
        assert_eq!(
            ColumnType::LongLong.integer_range(true),
            Some((0, u64::MAX as i128))
        );
        assert_eq!(ColumnType::Double.integer_range(false), None);
    }

    #[test]
    fn test_field_def_from_json() {
        let field: FieldDef = serde_json::from_str(
            r#"{"name": "price", "type": "decimal", "precision": 10, "scale": 2, "nullable": true}"#,
        )
        .unwrap();
        assert_eq!(
            field.column_type,
            ColumnType::Decimal {
                precision: 10,
                scale: 2
            }
        );
        assert!(field.nullable);
        assert!(!field.unsigned);
    }
}
