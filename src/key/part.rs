//! Key part descriptors
//!
//! A packed key buffer holds the parts of a composite index key back to back.
//! Each part occupies a `store_length` window:
//!
//! ```text
//! +-----------+-----------------+---------------------+
//! | null byte | padding         | value (length bytes)|
//! | optional  | optional        | little-endian       |
//! +-----------+-----------------+---------------------+
//! ```
//!
//! The value always sits in the last `length` bytes of the window.

use serde::{Deserialize, Serialize};

use super::errors::{KeyError, KeyResult};

/// Widest numeric key value (native register width)
pub const MAX_NUMERIC_WIDTH: usize = 8;

/// How the value bytes of a key part are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    SignedInt,
    UnsignedInt,
    Text,
    Float,
    /// Key types with no document mapping; never produce terms
    Unsupported,
}

impl KeyKind {
    pub fn is_numeric(&self) -> bool {
        matches!(self, KeyKind::SignedInt | KeyKind::UnsignedInt | KeyKind::Float)
    }
}

/// One segment of a composite index key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPart {
    /// Column the part is built from
    pub field: String,
    pub kind: KeyKind,
    /// Logical value width in bytes
    pub length: usize,
    /// Full window width, including null byte and padding
    pub store_length: usize,
    /// Whether the window starts with a null indicator byte
    pub nullable: bool,
}

impl KeyPart {
    /// Create a part whose window is exactly the null byte (if any) plus value.
    pub fn new(
        field: impl Into<String>,
        kind: KeyKind,
        length: usize,
        nullable: bool,
    ) -> KeyResult<Self> {
        let part = Self {
            field: field.into(),
            kind,
            length,
            store_length: length + usize::from(nullable),
            nullable,
        };
        part.check()?;
        Ok(part)
    }

    /// Widen the window; the extra bytes are padding ahead of the value.
    pub fn with_store_length(mut self, store_length: usize) -> KeyResult<Self> {
        self.store_length = store_length;
        self.check()?;
        Ok(self)
    }

    /// Validates the descriptor. Parts deserialized from JSON bypass
    /// [`KeyPart::new`], so the schema calls this as well.
    pub fn check(&self) -> KeyResult<()> {
        if self.kind.is_numeric() && self.length > MAX_NUMERIC_WIDTH {
            return Err(KeyError::invalid_part(
                &self.field,
                format!(
                    "numeric width {} exceeds {} bytes",
                    self.length, MAX_NUMERIC_WIDTH
                ),
            ));
        }
        let minimum = self.length + usize::from(self.nullable);
        if self.store_length < minimum {
            return Err(KeyError::invalid_part(
                &self.field,
                format!(
                    "store length {} cannot hold {} value bytes{}",
                    self.store_length,
                    self.length,
                    if self.nullable { " plus null byte" } else { "" }
                ),
            ));
        }
        Ok(())
    }

    /// Whether the window's null indicator is set
    pub fn is_null(&self, window: &[u8]) -> bool {
        self.nullable && window.first().map_or(false, |b| *b != 0)
    }

    /// The value bytes: the tail `length` bytes of the window.
    ///
    /// Empty when the window is shorter than the store length or the
    /// descriptor fails [`KeyPart::check`].
    pub fn value_bytes<'a>(&self, window: &'a [u8]) -> &'a [u8] {
        self.store_length
            .checked_sub(self.length)
            .and_then(|start| window.get(start..self.store_length))
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyErrorCode;

    #[test]
    fn test_store_length_includes_null_byte() {
        let part = KeyPart::new("a", KeyKind::SignedInt, 4, true).unwrap();
        assert_eq!(part.store_length, 5);
        let part = KeyPart::new("a", KeyKind::SignedInt, 4, false).unwrap();
        assert_eq!(part.store_length, 4);
    }

    #[test]
    fn test_numeric_width_over_eight_rejected() {
        let err = KeyPart::new("a", KeyKind::UnsignedInt, 9, false).unwrap_err();
        assert_eq!(err.code(), KeyErrorCode::BridgeKeyPartInvalid);

        // Text has no register-width limit
        assert!(KeyPart::new("t", KeyKind::Text, 64, false).is_ok());
    }

    #[test]
    fn test_store_length_too_small_rejected() {
        let part = KeyPart::new("a", KeyKind::Float, 8, true).unwrap();
        assert!(part.with_store_length(8).is_err());
    }

    #[test]
    fn test_value_taken_from_window_tail() {
        let part = KeyPart::new("a", KeyKind::SignedInt, 2, true)
            .unwrap()
            .with_store_length(5)
            .unwrap();
        let window = [0u8, 0xEE, 0xEE, 0x34, 0x12];
        assert!(!part.is_null(&window));
        assert_eq!(part.value_bytes(&window), &[0x34, 0x12]);
        assert!(part.value_bytes(&window[..3]).is_empty());
    }

    #[test]
    fn test_null_indicator() {
        let part = KeyPart::new("a", KeyKind::SignedInt, 1, true).unwrap();
        assert!(part.is_null(&[1, 0]));
        let not_nullable = KeyPart::new("a", KeyKind::SignedInt, 1, false).unwrap();
        assert!(!not_nullable.is_null(&[1]));
    }
}
