//! Document -> row
//!
//! Every field is reset first. A missing or explicit-null entry makes the
//! field NULL; anything else is converted to the field's declared type.

use crate::row::Row;
use crate::schema::TableDef;
use crate::value::{Document, TypedValue};

use super::errors::{CodecError, CodecResult};
use super::row_codec::{check_width, RowCodec};
use super::target::TargetField;

impl RowCodec {
    /// Decodes `doc` into `row` in place.
    ///
    /// On error the fields before the failing one keep their decoded values
    /// and the failing field holds its zero value; the row must be discarded.
    pub fn decode(&mut self, table: &TableDef, doc: &Document, row: &mut Row) -> CodecResult<()> {
        check_width(table, row)?;

        for (pos, field) in table.fields.iter().enumerate() {
            row.reset(pos, field);

            let value = match doc.get(&field.name) {
                None | Some(TypedValue::Null) => {
                    row.set_null(pos, field);
                    continue;
                }
                Some(value) => value,
            };

            let target = TargetField::new(field, self.time_zone);
            let stored = match value {
                TypedValue::SignedInt64(v) => target.store_integer(i128::from(*v)),
                TypedValue::UnsignedInt64(v) => target.store_integer(i128::from(*v)),
                TypedValue::Double(v) => target.store_real(*v),
                TypedValue::Binary(bytes) | TypedValue::Utf8(bytes) => target.store_text(bytes),
                TypedValue::DecimalText(text) => target.store_text(text.as_bytes()),
                TypedValue::DateEpochMillis(ms) => {
                    target.store_instant(ms.div_euclid(1000), ms.rem_euclid(1000) * 1000)
                }
                TypedValue::Timestamp(ts) => {
                    let ts = ts.normalized();
                    target.store_instant(ts.seconds, ts.micros)
                }
                TypedValue::Null | TypedValue::Bool(_) | TypedValue::Object(_) => Err(
                    CodecError::type_unsupported(&field.name, value.type_name()),
                ),
            }?;
            row.set(pos, stored);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;
    use crate::config::BridgeConfig;
    use crate::row::FieldValue;
    use crate::schema::{ColumnType, FieldDef};
    use crate::value::Timestamp;
    use chrono::{NaiveDate, NaiveTime};

    fn codec() -> RowCodec {
        RowCodec::new(&BridgeConfig::utc())
    }

    fn table() -> TableDef {
        TableDef::new(
            "t",
            vec![
                FieldDef::new("id", ColumnType::Long),
                FieldDef::new("name", ColumnType::Varchar).nullable(),
                FieldDef::new("price", ColumnType::Decimal { precision: 8, scale: 2 }).nullable(),
            ],
        )
    }

    #[test]
    fn test_missing_entry_sets_null() {
        let table = table();
        let mut row = Row::new(&table);
        let doc = Document::new().with("id", TypedValue::SignedInt64(7));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(0), Some(&FieldValue::Int(7)));
        assert!(row.is_null(1));
        assert!(row.is_null(2));
    }

    #[test]
    fn test_explicit_null_sets_null() {
        let table = table();
        let mut row = Row::new(&table);
        row.set(1, FieldValue::text("stale"));
        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("name", TypedValue::Null);

        codec().decode(&table, &doc, &mut row).unwrap();
        assert!(row.is_null(1));
    }

    #[test]
    fn test_unsigned_safe_widening() {
        let table = TableDef::new("t", vec![FieldDef::new("n", ColumnType::LongLong).unsigned()]);
        let mut row = Row::new(&table);
        let doc = Document::new().with("n", TypedValue::UnsignedInt64(u64::MAX));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(0), Some(&FieldValue::UInt(u64::MAX)));

        let doc = Document::new().with("n", TypedValue::DecimalText("18446744073709551615".into()));
        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(0), Some(&FieldValue::UInt(u64::MAX)));
    }

    #[test]
    fn test_decimal_text_canonicalised() {
        let table = table();
        let mut row = Row::new(&table);
        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("price", TypedValue::DecimalText("007.5".into()));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(2), Some(&FieldValue::Decimal("7.50".into())));
    }

    #[test]
    fn test_decimal_saturates_at_column_bounds() {
        let table = table();
        let mut row = Row::new(&table);

        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("price", TypedValue::DecimalText("123456789.125".into()));
        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(2), Some(&FieldValue::Decimal("999999.99".into())));

        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("price", TypedValue::Double(-1e12));
        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(2), Some(&FieldValue::Decimal("-999999.99".into())));

        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("price", TypedValue::SignedInt64(10_000_000));
        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(2), Some(&FieldValue::Decimal("999999.99".into())));
    }

    #[test]
    fn test_binary_and_utf8_store_raw_bytes() {
        let table = table();
        let mut row = Row::new(&table);
        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(1))
            .with("name", TypedValue::Binary(vec![0xff, 0x00, 0x41]));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(1), Some(&FieldValue::Bytes(vec![0xff, 0x00, 0x41])));
    }

    #[test]
    fn test_bool_rejected_after_zero_fill() {
        let table = table();
        let mut row = Row::new(&table);
        row.set(1, FieldValue::text("previous"));
        let doc = Document::new()
            .with("id", TypedValue::SignedInt64(3))
            .with("name", TypedValue::Bool(true));

        let err = codec().decode(&table, &doc, &mut row).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeTypeUnsupported);
        assert_eq!(err.field(), "name");
        // Earlier fields keep their values; the failing one is zeroed
        assert_eq!(row.get(0), Some(&FieldValue::Int(3)));
        assert_eq!(row.get(1), Some(&FieldValue::Bytes(Vec::new())));
    }

    #[test]
    fn test_object_rejected() {
        let table = table();
        let mut row = Row::new(&table);
        let doc = Document::new().with("id", TypedValue::Object(Document::new()));
        let err = codec().decode(&table, &doc, &mut row).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeTypeUnsupported);
    }

    #[test]
    fn test_date_millis_into_date_and_datetime() {
        let table = TableDef::new(
            "t",
            vec![
                FieldDef::new("d", ColumnType::Date),
                FieldDef::new("dt", ColumnType::DateTime),
            ],
        );
        let mut row = Row::new(&table);
        // 1970-01-02 00:00:01.250 UTC
        let doc = Document::new()
            .with("d", TypedValue::DateEpochMillis(86_401_250))
            .with("dt", TypedValue::DateEpochMillis(86_401_250));

        codec().decode(&table, &doc, &mut row).unwrap();
        let day = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(row.get(0), Some(&FieldValue::Date(day)));
        assert_eq!(
            row.get(1),
            Some(&FieldValue::DateTime(day.and_hms_milli_opt(0, 0, 1, 250).unwrap()))
        );
    }

    #[test]
    fn test_negative_millis_floor() {
        let table = TableDef::new("t", vec![FieldDef::new("ts", ColumnType::Timestamp)]);
        let mut row = Row::new(&table);
        let doc = Document::new().with("ts", TypedValue::DateEpochMillis(-1));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(
            row.get(0),
            Some(&FieldValue::Timestamp { seconds: -1, micros: 999_000 })
        );
    }

    #[test]
    fn test_timestamp_into_integer_is_epoch_micros() {
        let table = TableDef::new("t", vec![FieldDef::new("n", ColumnType::LongLong)]);
        let mut row = Row::new(&table);
        let doc = Document::new().with("n", TypedValue::Timestamp(Timestamp::new(3, 7)));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(row.get(0), Some(&FieldValue::Int(3_000_007)));
    }

    #[test]
    fn test_double_into_time() {
        let table = TableDef::new("t", vec![FieldDef::new("t", ColumnType::Time)]);
        let mut row = Row::new(&table);
        let doc = Document::new().with("t", TypedValue::Double(83015.5));

        codec().decode(&table, &doc, &mut row).unwrap();
        assert_eq!(
            row.get(0),
            Some(&FieldValue::Time(NaiveTime::from_hms_milli_opt(8, 30, 15, 500).unwrap()))
        );
    }
}
