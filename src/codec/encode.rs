//! Row -> document
//!
//! NULL fields produce no entry; omission is the null signal.

use chrono::{NaiveTime, Timelike};

use crate::config::DateTimeEncoding;
use crate::row::{FieldValue, Row};
use crate::schema::{ColumnType, FieldDef, TableDef};
use crate::value::{Document, Timestamp, TypedValue};

use super::decimal::{DecimalColumn, DecimalFit};
use super::errors::{CodecError, CodecResult};
use super::row_codec::{check_width, RowCodec};
use super::target::time_to_real;
use super::temporal::local_to_epoch;

impl RowCodec {
    /// Encodes every non-null field of `row` into a fresh document.
    ///
    /// The first failing field aborts the encode; no document is returned.
    pub fn encode(&mut self, table: &TableDef, row: &Row) -> CodecResult<Document> {
        check_width(table, row)?;

        let mut doc = Document::with_capacity(table.fields.len());
        for (pos, field) in table.fields.iter().enumerate() {
            // NULL-typed columns never carry a value
            if field.column_type == ColumnType::Null {
                continue;
            }
            let Some(value) = row.get(pos) else {
                continue;
            };
            let encoded = self.encode_field(field, value)?;
            doc.insert(field.name.clone(), encoded);
        }
        Ok(doc)
    }

    fn encode_field(&mut self, field: &FieldDef, value: &FieldValue) -> CodecResult<TypedValue> {
        match field.column_type {
            ColumnType::Tiny
            | ColumnType::Short
            | ColumnType::Int24
            | ColumnType::Long
            | ColumnType::Year => encode_integer(field, value),

            // Unsigned 64-bit values do not all fit a signed document integer
            ColumnType::LongLong if field.unsigned => match value {
                FieldValue::UInt(v) => Ok(TypedValue::DecimalText(v.to_string())),
                FieldValue::Int(v) if *v >= 0 => Ok(TypedValue::DecimalText(v.to_string())),
                other => Err(mismatch(field, other)),
            },
            ColumnType::LongLong => encode_integer(field, value),

            ColumnType::Float | ColumnType::Double => match value {
                FieldValue::Real(v) => Ok(TypedValue::Double(*v)),
                other => Err(mismatch(field, other)),
            },

            ColumnType::Time => match value {
                FieldValue::Time(t) => Ok(TypedValue::Double(time_to_real(*t))),
                other => Err(mismatch(field, other)),
            },

            ColumnType::Decimal { precision, scale } => {
                let column = DecimalColumn::new(precision, scale, field.unsigned).ok_or_else(|| {
                    CodecError::decimal_invalid(
                        &field.name,
                        format!("precision {} scale {}", precision, scale),
                    )
                })?;
                match value {
                    FieldValue::Decimal(text) => match column.canonical(text) {
                        Ok(canonical) => Ok(TypedValue::DecimalText(canonical)),
                        Err(DecimalFit::Malformed) => Err(CodecError::decimal_invalid(
                            &field.name,
                            format!("'{}' is not a decimal", text),
                        )),
                        Err(DecimalFit::OutOfRange) => Err(CodecError::decimal_invalid(
                            &field.name,
                            format!("'{}' out of range for DECIMAL({},{})", text, precision, scale),
                        )),
                    },
                    other => Err(mismatch(field, other)),
                }
            }

            ColumnType::Char
            | ColumnType::Varchar
            | ColumnType::TinyBlob
            | ColumnType::Blob
            | ColumnType::MediumBlob
            | ColumnType::LongBlob => match value {
                FieldValue::Bytes(bytes) => self.encode_bytes(field, bytes),
                other => Err(mismatch(field, other)),
            },

            ColumnType::Date => match value {
                FieldValue::Date(date) => {
                    let midnight = date.and_time(NaiveTime::default());
                    let seconds = local_to_epoch(self.time_zone, midnight);
                    Ok(TypedValue::DateEpochMillis(seconds.saturating_mul(1000)))
                }
                other => Err(mismatch(field, other)),
            },

            ColumnType::Timestamp => match value {
                FieldValue::Timestamp { seconds, micros } => Ok(TypedValue::Timestamp(
                    Timestamp::new(*seconds, i64::from(*micros)),
                )),
                other => Err(mismatch(field, other)),
            },

            ColumnType::DateTime => match value {
                FieldValue::DateTime(wall) => {
                    let seconds = local_to_epoch(self.time_zone, *wall);
                    let ts = match self.datetime_encoding {
                        DateTimeEncoding::Timestamp => Timestamp::new(seconds, 0),
                        // 32-bit seconds cover 1970-01-01 through 2106-02-07 UTC
                        DateTimeEncoding::LegacyPacked => {
                            if u32::try_from(seconds).is_err() {
                                return Err(CodecError::value_invalid(
                                    &field.name,
                                    format!("{} outside the legacy packed range", wall),
                                ));
                            }
                            let micros = i64::from(wall.nanosecond() / 1000);
                            Timestamp::unpack(Timestamp::new(seconds, micros).pack())
                        }
                    };
                    Ok(TypedValue::Timestamp(ts))
                }
                other => Err(mismatch(field, other)),
            },

            ColumnType::Null
            | ColumnType::Bit
            | ColumnType::Enum
            | ColumnType::Set
            | ColumnType::Json
            | ColumnType::Geometry => Err(CodecError::type_unsupported(
                &field.name,
                field.column_type.type_name(),
            )),
        }
    }

    fn encode_bytes(&mut self, field: &FieldDef, bytes: &[u8]) -> CodecResult<TypedValue> {
        if bytes.len() >= self.field_max_len {
            return Err(CodecError::field_too_large(
                &field.name,
                bytes.len(),
                self.field_max_len,
            ));
        }
        let staged = self.scratch.stage(bytes).to_vec();
        if field.binary {
            Ok(TypedValue::Binary(staged))
        } else {
            Ok(TypedValue::Utf8(staged))
        }
    }
}

fn encode_integer(field: &FieldDef, value: &FieldValue) -> CodecResult<TypedValue> {
    match (value, field.unsigned) {
        (FieldValue::Int(v), false) => Ok(TypedValue::SignedInt64(*v)),
        (FieldValue::UInt(v), true) => Ok(TypedValue::UnsignedInt64(*v)),
        (FieldValue::Int(v), true) => u64::try_from(*v)
            .map(TypedValue::UnsignedInt64)
            .map_err(|_| CodecError::value_invalid(&field.name, format!("{} is negative", v))),
        (FieldValue::UInt(v), false) => i64::try_from(*v)
            .map(TypedValue::SignedInt64)
            .map_err(|_| CodecError::value_invalid(&field.name, format!("{} overflows", v))),
        (other, _) => Err(mismatch(field, other)),
    }
}

fn mismatch(field: &FieldDef, value: &FieldValue) -> CodecError {
    CodecError::value_invalid(
        &field.name,
        format!(
            "{} value in {} column",
            value_kind(value),
            field.column_type.type_name()
        ),
    )
}

fn value_kind(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Int(_) => "int",
        FieldValue::UInt(_) => "uint",
        FieldValue::Real(_) => "real",
        FieldValue::Decimal(_) => "decimal",
        FieldValue::Bytes(_) => "bytes",
        FieldValue::Date(_) => "date",
        FieldValue::Time(_) => "time",
        FieldValue::DateTime(_) => "datetime",
        FieldValue::Timestamp { .. } => "timestamp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecErrorCode;
    use crate::config::{BridgeConfig, TimeZoneSetting};
    use chrono::NaiveDate;

    fn codec() -> RowCodec {
        RowCodec::new(&BridgeConfig::utc())
    }

    fn one_field(field: FieldDef) -> TableDef {
        TableDef::new("t", vec![field])
    }

    fn encode_one(field: FieldDef, value: FieldValue) -> CodecResult<Document> {
        codec().encode(&one_field(field), &Row::from_values(vec![Some(value)]))
    }

    #[test]
    fn test_null_fields_are_omitted() {
        let table = TableDef::new(
            "t",
            vec![
                FieldDef::new("a", ColumnType::Long),
                FieldDef::new("b", ColumnType::Varchar).nullable(),
            ],
        );
        let row = Row::from_values(vec![Some(FieldValue::Int(1)), None]);
        let doc = codec().encode(&table, &row).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!doc.contains_key("b"));
    }

    #[test]
    fn test_integers_by_signedness() {
        let doc = encode_one(FieldDef::new("a", ColumnType::Int24), FieldValue::Int(-5)).unwrap();
        assert_eq!(doc.get("a"), Some(&TypedValue::SignedInt64(-5)));

        let doc = encode_one(
            FieldDef::new("a", ColumnType::Short).unsigned(),
            FieldValue::UInt(65535),
        )
        .unwrap();
        assert_eq!(doc.get("a"), Some(&TypedValue::UnsignedInt64(65535)));
    }

    #[test]
    fn test_unsigned_bigint_becomes_decimal_text() {
        let doc = encode_one(
            FieldDef::new("a", ColumnType::LongLong).unsigned(),
            FieldValue::UInt(u64::MAX),
        )
        .unwrap();
        assert_eq!(
            doc.get("a"),
            Some(&TypedValue::DecimalText("18446744073709551615".into()))
        );

        let doc = encode_one(FieldDef::new("a", ColumnType::LongLong), FieldValue::Int(i64::MIN))
            .unwrap();
        assert_eq!(doc.get("a"), Some(&TypedValue::SignedInt64(i64::MIN)));
    }

    #[test]
    fn test_decimal_negative_scale_rejected() {
        let err = encode_one(
            FieldDef::new("d", ColumnType::Decimal { precision: 5, scale: -1 }),
            FieldValue::Decimal("1".into()),
        )
        .unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeDecimalInvalid);
        assert_eq!(err.field(), "d");
    }

    #[test]
    fn test_decimal_beyond_precision_rejected() {
        let field = FieldDef::new("d", ColumnType::Decimal { precision: 5, scale: 2 });

        let err = encode_one(field.clone(), FieldValue::Decimal("123456789.125".into()))
            .unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeDecimalInvalid);
        assert!(err.message().contains("out of range"));

        let doc = encode_one(field.clone(), FieldValue::Decimal("-999.99".into())).unwrap();
        assert_eq!(doc.get("d"), Some(&TypedValue::DecimalText("-999.99".into())));

        // Rounding up into a fourth integer digit overflows DECIMAL(5,2)
        assert!(encode_one(field, FieldValue::Decimal("999.996".into())).is_err());
    }

    #[test]
    fn test_text_and_binary() {
        let doc = encode_one(FieldDef::new("s", ColumnType::Varchar), FieldValue::text("héllo"))
            .unwrap();
        assert_eq!(doc.get("s"), Some(&TypedValue::utf8("héllo")));

        let doc = encode_one(
            FieldDef::new("b", ColumnType::Blob).binary(),
            FieldValue::Bytes(vec![0, 1, 2]),
        )
        .unwrap();
        assert_eq!(doc.get("b"), Some(&TypedValue::Binary(vec![0, 1, 2])));
    }

    #[test]
    fn test_field_too_large() {
        let config = BridgeConfig {
            field_max_len: 8,
            ..BridgeConfig::utc()
        };
        let mut codec = RowCodec::new(&config);
        let table = one_field(FieldDef::new("s", ColumnType::Blob));

        let row = Row::from_values(vec![Some(FieldValue::Bytes(vec![b'x'; 8]))]);
        let err = codec.encode(&table, &row).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeFieldTooLarge);

        let row = Row::from_values(vec![Some(FieldValue::Bytes(vec![b'x'; 7]))]);
        assert!(codec.encode(&table, &row).is_ok());
    }

    #[test]
    fn test_large_text_grows_scratch() {
        let mut codec = codec();
        let table = one_field(FieldDef::new("s", ColumnType::MediumBlob));
        let row = Row::from_values(vec![Some(FieldValue::Bytes(vec![b'a'; 1500]))]);
        let doc = codec.encode(&table, &row).unwrap();
        assert_eq!(codec.scratch().size(), 2048);
        assert_eq!(doc.get("s"), Some(&TypedValue::Utf8(vec![b'a'; 1500])));
    }

    #[test]
    fn test_date_is_local_midnight_millis() {
        let doc = encode_one(
            FieldDef::new("d", ColumnType::Date),
            FieldValue::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()),
        )
        .unwrap();
        assert_eq!(doc.get("d"), Some(&TypedValue::DateEpochMillis(86_400_000)));

        let config = BridgeConfig {
            time_zone: TimeZoneSetting::OffsetSeconds(3600),
            ..BridgeConfig::default()
        };
        let table = one_field(FieldDef::new("d", ColumnType::Date));
        let row = Row::from_values(vec![Some(FieldValue::Date(
            NaiveDate::from_ymd_opt(1970, 1, 2).unwrap(),
        ))]);
        let doc = RowCodec::new(&config).encode(&table, &row).unwrap();
        assert_eq!(doc.get("d"), Some(&TypedValue::DateEpochMillis(82_800_000)));
    }

    #[test]
    fn test_datetime_encodings() {
        let wall = NaiveDate::from_ymd_opt(1970, 1, 1)
            .unwrap()
            .and_hms_micro_opt(0, 1, 40, 123_456)
            .unwrap();
        let table = one_field(FieldDef::new("dt", ColumnType::DateTime));
        let row = Row::from_values(vec![Some(FieldValue::DateTime(wall))]);

        let doc = codec().encode(&table, &row).unwrap();
        assert_eq!(doc.get("dt"), Some(&TypedValue::Timestamp(Timestamp::new(100, 0))));

        let config = BridgeConfig {
            datetime_encoding: DateTimeEncoding::LegacyPacked,
            ..BridgeConfig::utc()
        };
        let doc = RowCodec::new(&config).encode(&table, &row).unwrap();
        assert_eq!(
            doc.get("dt"),
            Some(&TypedValue::Timestamp(Timestamp::new(100, 123_456)))
        );
    }

    #[test]
    fn test_legacy_packing_rejects_out_of_range_seconds() {
        let config = BridgeConfig {
            datetime_encoding: DateTimeEncoding::LegacyPacked,
            ..BridgeConfig::utc()
        };
        let table = one_field(FieldDef::new("dt", ColumnType::DateTime));
        let before_epoch = NaiveDate::from_ymd_opt(1960, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = Row::from_values(vec![Some(FieldValue::DateTime(before_epoch))]);
        let err = RowCodec::new(&config).encode(&table, &row).unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeValueInvalid);

        let after_range = NaiveDate::from_ymd_opt(2106, 2, 8)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let row = Row::from_values(vec![Some(FieldValue::DateTime(after_range))]);
        assert!(RowCodec::new(&config).encode(&table, &row).is_err());

        // The default encoding has no such limit
        let row = Row::from_values(vec![Some(FieldValue::DateTime(before_epoch))]);
        assert!(codec().encode(&table, &row).is_ok());
    }

    #[test]
    fn test_timestamp_passes_components() {
        let doc = encode_one(
            FieldDef::new("ts", ColumnType::Timestamp),
            FieldValue::Timestamp { seconds: 1_600_000_000, micros: 42 },
        )
        .unwrap();
        assert_eq!(
            doc.get("ts"),
            Some(&TypedValue::Timestamp(Timestamp::new(1_600_000_000, 42)))
        );
    }

    #[test]
    fn test_null_typed_column_emits_nothing() {
        let table = TableDef::new(
            "t",
            vec![
                FieldDef::new("a", ColumnType::Long),
                FieldDef::new("n", ColumnType::Null),
            ],
        );
        let row = Row::from_values(vec![Some(FieldValue::Int(1)), Some(FieldValue::Int(9))]);
        let doc = codec().encode(&table, &row).unwrap();
        assert_eq!(doc.len(), 1);
        assert!(!doc.contains_key("n"));
    }

    #[test]
    fn test_unmapped_type_rejected() {
        let err = encode_one(FieldDef::new("g", ColumnType::Geometry), FieldValue::text("x"))
            .unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeTypeUnsupported);
    }

    #[test]
    fn test_value_kind_mismatch() {
        let err = encode_one(FieldDef::new("a", ColumnType::Long), FieldValue::text("1"))
            .unwrap_err();
        assert_eq!(err.code(), CodecErrorCode::BridgeValueInvalid);
    }

    #[test]
    fn test_row_width_checked() {
        let table = TableDef::new(
            "t",
            vec![
                FieldDef::new("a", ColumnType::Long),
                FieldDef::new("b", ColumnType::Long),
            ],
        );
        let row = Row::from_values(vec![Some(FieldValue::Int(1))]);
        assert!(codec().encode(&table, &row).is_err());
    }
}
