//! Store rules for decoded values
//!
//! A document value is written into a relational field by converting it to
//! the field's declared type. Integers clamp to the column range, reals round,
//! text parses, and instants break down in the configured zone.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::config::TimeZoneSetting;
use crate::row::FieldValue;
use crate::schema::{ColumnType, FieldDef};

use super::decimal::DecimalColumn;
use super::errors::{CodecError, CodecResult};
use super::temporal::{epoch_to_local, local_to_epoch};

const MICROS_PER_SECOND: i64 = 1_000_000;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIME_FORMAT: &str = "%H:%M:%S%.f";

/// The relational field a decoded value is stored into
pub(crate) struct TargetField<'a> {
    def: &'a FieldDef,
    zone: TimeZoneSetting,
}

impl<'a> TargetField<'a> {
    pub(crate) fn new(def: &'a FieldDef, zone: TimeZoneSetting) -> Self {
        Self { def, zone }
    }

    /// Stores an integer, widened to i128 so both signed and unsigned 64-bit
    /// inputs fit.
    pub(crate) fn store_integer(&self, value: i128) -> CodecResult<FieldValue> {
        let def = self.def;
        match def.column_type {
            ColumnType::Tiny
            | ColumnType::Short
            | ColumnType::Int24
            | ColumnType::Long
            | ColumnType::LongLong
            | ColumnType::Year => Ok(self.clamped(value)),
            ColumnType::Float => Ok(FieldValue::Real(value as f32 as f64)),
            ColumnType::Double => Ok(FieldValue::Real(value as f64)),
            ColumnType::Decimal { precision, scale } => {
                self.decimal(&value.to_string(), precision, scale)
            },
            ColumnType::Char
            | ColumnType::Varchar
            | ColumnType::TinyBlob
            | ColumnType::Blob
            | ColumnType::MediumBlob
            | ColumnType::LongBlob => Ok(self.bytes(value.to_string().as_bytes())),
            ColumnType::Date => date_from_packed(value)
                .map(FieldValue::Date)
                .ok_or_else(|| self.invalid(format!("{} is not a YYYYMMDD date", value))),
            ColumnType::DateTime => datetime_from_packed(value)
                .map(FieldValue::DateTime)
                .ok_or_else(|| self.invalid(format!("{} is not a YYYYMMDDHHMMSS datetime", value))),
            ColumnType::Timestamp => datetime_from_packed(value)
                .map(|wall| self.timestamp_from_wall(wall))
                .ok_or_else(|| self.invalid(format!("{} is not a YYYYMMDDHHMMSS datetime", value))),
            ColumnType::Time => i64::try_from(value)
                .ok()
                .and_then(|v| time_from_hhmmss(v, 0))
                .map(FieldValue::Time)
                .ok_or_else(|| self.invalid(format!("{} is not a HHMMSS time", value))),
            ColumnType::Null
            | ColumnType::Bit
            | ColumnType::Enum
            | ColumnType::Set
            | ColumnType::Json
            | ColumnType::Geometry => Err(self.unsupported()),
        }
    }

    pub(crate) fn store_real(&self, value: f64) -> CodecResult<FieldValue> {
        let def = self.def;
        match def.column_type {
            ColumnType::Float => Ok(FieldValue::Real(value as f32 as f64)),
            ColumnType::Double => Ok(FieldValue::Real(value)),
            ColumnType::Decimal { precision, scale } => {
                self.decimal(&value.to_string(), precision, scale)
            },
            ColumnType::Char
            | ColumnType::Varchar
            | ColumnType::TinyBlob
            | ColumnType::Blob
            | ColumnType::MediumBlob
            | ColumnType::LongBlob => Ok(self.bytes(value.to_string().as_bytes())),
            ColumnType::Time => time_from_real(value)
                .map(FieldValue::Time)
                .ok_or_else(|| self.invalid(format!("{} is not a HHMMSS time", value))),
            _ if !value.is_finite() => Err(self.invalid(format!("{} is not finite", value))),
            // `as` saturates at the i128 range
            ColumnType::Date | ColumnType::DateTime | ColumnType::Timestamp => {
                self.store_integer(value.trunc() as i128)
            }
            _ => self.store_integer(value.round() as i128),
        }
    }

    /// Stores raw text bytes. Text columns take them as-is; other columns
    /// parse them.
    pub(crate) fn store_text(&self, bytes: &[u8]) -> CodecResult<FieldValue> {
        let def = self.def;
        if def.column_type.is_text() {
            return Ok(self.bytes(bytes));
        }
        let text = std::str::from_utf8(bytes)
            .map_err(|_| self.invalid("text is not valid UTF-8"))?
            .trim();

        match def.column_type {
            ColumnType::Tiny
            | ColumnType::Short
            | ColumnType::Int24
            | ColumnType::Long
            | ColumnType::LongLong
            | ColumnType::Year => match text.parse::<i128>() {
                Ok(v) => self.store_integer(v),
                Err(_) => self.store_real(self.parse_real(text)?),
            },
            ColumnType::Float | ColumnType::Double => self.store_real(self.parse_real(text)?),
            ColumnType::Decimal { precision, scale } => self.decimal(text, precision, scale),
            ColumnType::Date => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|_| self.invalid(format!("'{}' is not a date", text))),
            ColumnType::DateTime => self
                .parse_datetime(text)
                .map(FieldValue::DateTime),
            ColumnType::Timestamp => self
                .parse_datetime(text)
                .map(|wall| self.timestamp_from_wall(wall)),
            ColumnType::Time => NaiveTime::parse_from_str(text, TIME_FORMAT)
                .map(FieldValue::Time)
                .map_err(|_| self.invalid(format!("'{}' is not a time", text))),
            _ => Err(self.unsupported()),
        }
    }

    /// Stores an instant given as epoch seconds + microseconds.
    ///
    /// Date and time columns break it down in the configured zone; every other
    /// column receives the epoch microseconds as an integer.
    pub(crate) fn store_instant(&self, seconds: i64, micros: i64) -> CodecResult<FieldValue> {
        match self.def.column_type {
            ColumnType::Timestamp => Ok(FieldValue::Timestamp {
                seconds,
                micros: micros.clamp(0, MICROS_PER_SECOND - 1) as u32,
            }),
            ColumnType::DateTime => self
                .wall_clock(seconds)?
                .with_nanosecond(micros.clamp(0, MICROS_PER_SECOND - 1) as u32 * 1000)
                .map(FieldValue::DateTime)
                .ok_or_else(|| self.invalid("fractional seconds out of range")),
            ColumnType::Date => Ok(FieldValue::Date(self.wall_clock(seconds)?.date())),
            ColumnType::Time => {
                let wall = self.wall_clock(seconds)?;
                wall.time()
                    .with_nanosecond(micros.clamp(0, MICROS_PER_SECOND - 1) as u32 * 1000)
                    .map(FieldValue::Time)
                    .ok_or_else(|| self.invalid("fractional seconds out of range"))
            }
            _ => {
                let epoch_micros = i128::from(seconds) * i128::from(MICROS_PER_SECOND)
                    + i128::from(micros);
                self.store_integer(epoch_micros)
            }
        }
    }

    fn clamped(&self, value: i128) -> FieldValue {
        let (min, max) = self
            .def
            .column_type
            .integer_range(self.def.unsigned)
            .unwrap_or((i128::from(i64::MIN), i128::from(i64::MAX)));
        let value = value.clamp(min, max);
        if self.def.unsigned {
            FieldValue::UInt(value as u64)
        } else {
            FieldValue::Int(value as i64)
        }
    }

    /// Decimal targets round to the column scale and saturate at the
    /// column's largest magnitude, as integer targets clamp.
    fn decimal(&self, text: &str, precision: i32, scale: i32) -> CodecResult<FieldValue> {
        let column = DecimalColumn::new(precision, scale, self.def.unsigned).ok_or_else(|| {
            CodecError::decimal_invalid(
                &self.def.name,
                format!("precision {} scale {}", precision, scale),
            )
        })?;
        column
            .clamped(text)
            .map(FieldValue::Decimal)
            .ok_or_else(|| {
                CodecError::decimal_invalid(&self.def.name, format!("'{}' is not a decimal", text))
            })
    }

    /// CHAR and VARCHAR keep at most their declared length: characters for
    /// text columns, bytes for binary ones.
    fn bytes(&self, bytes: &[u8]) -> FieldValue {
        let def = self.def;
        let limit = def.length as usize;
        if !matches!(def.column_type, ColumnType::Char | ColumnType::Varchar) || limit == 0 {
            return FieldValue::Bytes(bytes.to_vec());
        }
        let end = if def.binary {
            limit.min(bytes.len())
        } else {
            char_prefix_len(bytes, limit)
        };
        FieldValue::Bytes(bytes[..end].to_vec())
    }

    fn timestamp_from_wall(&self, wall: NaiveDateTime) -> FieldValue {
        FieldValue::Timestamp {
            seconds: local_to_epoch(self.zone, wall),
            micros: wall.nanosecond() / 1000,
        }
    }

    fn wall_clock(&self, seconds: i64) -> CodecResult<NaiveDateTime> {
        epoch_to_local(self.zone, seconds)
            .ok_or_else(|| self.invalid(format!("epoch second {} out of range", seconds)))
    }

    fn parse_real(&self, text: &str) -> CodecResult<f64> {
        text.parse::<f64>()
            .map_err(|_| self.invalid(format!("'{}' is not a number", text)))
    }

    fn parse_datetime(&self, text: &str) -> CodecResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(text, DATETIME_FORMAT)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(|d| d.and_time(NaiveTime::default()))
            })
            .map_err(|_| self.invalid(format!("'{}' is not a datetime", text)))
    }

    fn invalid(&self, reason: impl Into<String>) -> CodecError {
        CodecError::value_invalid(&self.def.name, reason)
    }

    fn unsupported(&self) -> CodecError {
        CodecError::type_unsupported(&self.def.name, self.def.column_type.type_name())
    }
}

/// Byte length of the first `chars` UTF-8 characters of `bytes`.
///
/// Continuation bytes never start a character, so the cut never lands
/// inside a multi-byte sequence.
fn char_prefix_len(bytes: &[u8], chars: usize) -> usize {
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| (**b & 0xC0) != 0x80)
        .nth(chars)
        .map_or(bytes.len(), |(pos, _)| pos)
}

/// TIME as the real HHMMSS.ffffff
pub(crate) fn time_to_real(time: NaiveTime) -> f64 {
    let hhmmss = time.hour() * 10_000 + time.minute() * 100 + time.second();
    let micros = (time.nanosecond() / 1000).min(999_999);
    f64::from(hhmmss) + f64::from(micros) / 1e6
}

fn time_from_real(value: f64) -> Option<NaiveTime> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let whole = value.trunc();
    let mut micros = ((value - whole) * 1e6).round() as u32;
    let mut whole = whole as i64;
    if micros >= 1_000_000 {
        micros -= 1_000_000;
        whole += 1;
    }
    time_from_hhmmss(whole, micros)
}

fn time_from_hhmmss(value: i64, micros: u32) -> Option<NaiveTime> {
    if value < 0 {
        return None;
    }
    let hour = u32::try_from(value / 10_000).ok()?;
    let minute = (value / 100 % 100) as u32;
    let second = (value % 100) as u32;
    NaiveTime::from_hms_micro_opt(hour, minute, second, micros)
}

fn date_from_packed(value: i128) -> Option<NaiveDate> {
    if value < 0 {
        return None;
    }
    let year = i32::try_from(value / 10_000).ok()?;
    let month = (value / 100 % 100) as u32;
    let day = (value % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn datetime_from_packed(value: i128) -> Option<NaiveDateTime> {
    let date = date_from_packed(value / 1_000_000)?;
    let time = time_from_hhmmss(i64::try_from(value % 1_000_000).ok()?, 0)?;
    Some(date.and_time(time))
}
