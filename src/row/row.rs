//! Caller-owned relational rows

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::schema::{ColumnType, FieldDef, TableDef};

use super::NullBitmap;

/// Stored value of one relational field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Signed integer columns (and YEAR)
    Int(i64),
    /// Unsigned integer columns
    UInt(u64),
    /// FLOAT and DOUBLE columns
    Real(f64),
    /// DECIMAL columns, canonical string at the declared scale
    Decimal(String),
    /// CHAR/VARCHAR/BLOB columns, raw bytes
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    /// DATETIME columns, wall-clock with microseconds
    DateTime(NaiveDateTime),
    /// TIMESTAMP columns: epoch seconds + microseconds
    Timestamp { seconds: i64, micros: u32 },
}

impl FieldValue {
    /// The zero value a reset field holds for its column
    pub fn zero_for(field: &FieldDef) -> Self {
        match field.column_type {
            ColumnType::Tiny
            | ColumnType::Short
            | ColumnType::Int24
            | ColumnType::Long
            | ColumnType::LongLong
            | ColumnType::Year => {
                if field.unsigned {
                    FieldValue::UInt(0)
                } else {
                    FieldValue::Int(0)
                }
            }
            ColumnType::Float | ColumnType::Double => FieldValue::Real(0.0),
            ColumnType::Time => FieldValue::Time(NaiveTime::default()),
            ColumnType::Decimal { scale, .. } => {
                let scale = usize::try_from(scale).unwrap_or(0);
                if scale == 0 {
                    FieldValue::Decimal("0".into())
                } else {
                    FieldValue::Decimal(format!("0.{}", "0".repeat(scale)))
                }
            }
            ColumnType::Date => FieldValue::Date(NaiveDate::default()),
            ColumnType::DateTime => FieldValue::DateTime(NaiveDateTime::default()),
            ColumnType::Timestamp => FieldValue::Timestamp {
                seconds: 0,
                micros: 0,
            },
            ColumnType::Char
            | ColumnType::Varchar
            | ColumnType::TinyBlob
            | ColumnType::Blob
            | ColumnType::MediumBlob
            | ColumnType::LongBlob
            | ColumnType::Null
            | ColumnType::Bit
            | ColumnType::Enum
            | ColumnType::Set
            | ColumnType::Json
            | ColumnType::Geometry => FieldValue::Bytes(Vec::new()),
        }
    }

    /// Convenience constructor for text fields
    pub fn text(s: impl AsRef<str>) -> Self {
        FieldValue::Bytes(s.as_ref().as_bytes().to_vec())
    }
}

/// Ordered field values plus a null bitmap.
///
/// Rows are built and owned by the relational engine; the codec reads them
/// on encode and rewrites them in place on decode.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<FieldValue>,
    nulls: NullBitmap,
}

impl Row {
    /// Creates a row of zero values for `table`
    pub fn new(table: &TableDef) -> Self {
        Self {
            values: table.fields.iter().map(FieldValue::zero_for).collect(),
            nulls: NullBitmap::with_len(table.fields.len()),
        }
    }

    /// Creates a row from optional values; `None` is NULL
    pub fn from_values(values: Vec<Option<FieldValue>>) -> Self {
        let mut nulls = NullBitmap::with_len(values.len());
        let values = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.unwrap_or_else(|| {
                    nulls.set(i);
                    FieldValue::Bytes(Vec::new())
                })
            })
            .collect();
        Self { values, nulls }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_null(&self, pos: usize) -> bool {
        self.nulls.is_set(pos)
    }

    /// The field value, or `None` when NULL or out of range
    pub fn get(&self, pos: usize) -> Option<&FieldValue> {
        if self.is_null(pos) {
            return None;
        }
        self.values.get(pos)
    }

    /// Stores a value and clears the null bit
    pub fn set(&mut self, pos: usize, value: FieldValue) {
        if let Some(slot) = self.values.get_mut(pos) {
            *slot = value;
            self.nulls.clear(pos);
        }
    }

    /// Marks the field NULL. Non-nullable fields keep their current value.
    pub fn set_null(&mut self, pos: usize, field: &FieldDef) {
        if field.nullable {
            self.nulls.set(pos);
        }
    }

    /// Resets the field to its zero value, non-null
    pub fn reset(&mut self, pos: usize, field: &FieldDef) {
        self.set(pos, FieldValue::zero_for(field));
    }

    pub fn nulls(&self) -> &NullBitmap {
        &self.nulls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableDef {
        TableDef::new(
            "t",
            vec![
                FieldDef::new("a", ColumnType::Long),
                FieldDef::new("b", ColumnType::Varchar).nullable(),
                FieldDef::new("c", ColumnType::Decimal { precision: 8, scale: 2 }),
            ],
        )
    }

    #[test]
    fn test_new_row_zero_filled() {
        let row = Row::new(&table());
        assert_eq!(row.get(0), Some(&FieldValue::Int(0)));
        assert_eq!(row.get(1), Some(&FieldValue::Bytes(Vec::new())));
        assert_eq!(row.get(2), Some(&FieldValue::Decimal("0.00".into())));
    }

    #[test]
    fn test_set_null_respects_nullable() {
        let table = table();
        let mut row = Row::new(&table);
        row.set_null(0, &table.fields[0]);
        row.set_null(1, &table.fields[1]);
        assert!(!row.is_null(0));
        assert!(row.is_null(1));
        assert_eq!(row.get(1), None);

        row.set(1, FieldValue::text("x"));
        assert!(!row.is_null(1));
    }

    #[test]
    fn test_from_values() {
        let row = Row::from_values(vec![Some(FieldValue::Int(7)), None]);
        assert_eq!(row.len(), 2);
        assert!(row.is_null(1));
        assert_eq!(row.get(0), Some(&FieldValue::Int(7)));
    }
}
