//! Scalar values as they travel through documents and filters

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};

use super::Document;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Seconds + microseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    /// Whole seconds since the epoch
    pub seconds: i64,
    /// Fractional part in microseconds
    pub micros: i64,
}

impl Timestamp {
    /// Create a timestamp from its components as given
    pub fn new(seconds: i64, micros: i64) -> Self {
        Self { seconds, micros }
    }

    /// Carry whole seconds out of `micros` so that 0 <= micros < 1_000_000.
    pub fn normalized(self) -> Self {
        Self {
            seconds: self.seconds + self.micros.div_euclid(MICROS_PER_SECOND),
            micros: self.micros.rem_euclid(MICROS_PER_SECOND),
        }
    }

    /// Instant in microseconds since the epoch
    pub fn epoch_micros(&self) -> i64 {
        self.seconds
            .saturating_mul(MICROS_PER_SECOND)
            .saturating_add(self.micros)
    }

    /// Pack into the legacy 64-bit layout.
    ///
    /// Layout is fixed regardless of host byte order: the high 32 bits carry
    /// the seconds, the low 32 bits carry the microseconds. Both components
    /// are truncated to 32 bits.
    pub fn pack(&self) -> u64 {
        ((self.seconds as u32 as u64) << 32) | (self.micros as u32 as u64)
    }

    /// Inverse of [`Timestamp::pack`]
    pub fn unpack(packed: u64) -> Self {
        Self {
            seconds: (packed >> 32) as i64,
            micros: (packed & 0xFFFF_FFFF) as i64,
        }
    }
}

/// One scalar value in document form.
///
/// `Bool` and `Object` only ever arrive from the store side; the row codec
/// never produces them and refuses them on decode.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    SignedInt64(i64),
    UnsignedInt64(u64),
    Double(f64),
    /// Exact decimal carried as its canonical string
    DecimalText(String),
    Binary(Vec<u8>),
    /// Raw text bytes, no terminator, no charset reinterpretation
    Utf8(Vec<u8>),
    /// Milliseconds since the epoch
    DateEpochMillis(i64),
    Timestamp(Timestamp),
    Null,
    Bool(bool),
    Object(Document),
}

impl TypedValue {
    /// Convenience constructor for text values
    pub fn utf8(text: impl AsRef<str>) -> Self {
        TypedValue::Utf8(text.as_ref().as_bytes().to_vec())
    }

    /// Returns the variant name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            TypedValue::SignedInt64(_) => "int64",
            TypedValue::UnsignedInt64(_) => "uint64",
            TypedValue::Double(_) => "double",
            TypedValue::DecimalText(_) => "decimal",
            TypedValue::Binary(_) => "binary",
            TypedValue::Utf8(_) => "string",
            TypedValue::DateEpochMillis(_) => "date",
            TypedValue::Timestamp(_) => "timestamp",
            TypedValue::Null => "null",
            TypedValue::Bool(_) => "bool",
            TypedValue::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Text content, if this is a string value holding valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Utf8(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }

    /// Render in extended JSON form.
    pub fn to_json(&self) -> Value {
        match self {
            TypedValue::SignedInt64(v) => json!(v),
            TypedValue::UnsignedInt64(v) => json!(v),
            // NaN and infinities have no JSON number form
            TypedValue::Double(v) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            TypedValue::DecimalText(s) => json!({ "$decimal": s }),
            TypedValue::Binary(bytes) => json!({
                "$binary": BASE64.encode(bytes),
                "$type": "00",
            }),
            TypedValue::Utf8(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            TypedValue::DateEpochMillis(ms) => json!({ "$date": ms }),
            TypedValue::Timestamp(ts) => json!({
                "$timestamp": { "t": ts.seconds, "i": ts.micros }
            }),
            TypedValue::Null => Value::Null,
            TypedValue::Bool(b) => Value::Bool(*b),
            TypedValue::Object(doc) => doc.to_json(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}
