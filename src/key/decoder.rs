//! Typed decoding of packed key part values
//!
//! Each supported (kind, width) pair has an explicit decode arm reading
//! little-endian bytes from the tail of the part's window. Widths outside the
//! supported set decode to `None`: the part contributes no predicate term.

use crate::codec::ScratchBuffer;
use crate::value::TypedValue;

use super::errors::{KeyError, KeyResult};
use super::part::{KeyKind, KeyPart};

/// Decodes key part values, staging text through the context's scratch buffer.
pub struct KeyPartDecoder<'s> {
    scratch: &'s mut ScratchBuffer,
}

impl<'s> KeyPartDecoder<'s> {
    pub fn new(scratch: &'s mut ScratchBuffer) -> Self {
        Self { scratch }
    }

    /// Decodes the part starting at the head of `key`.
    ///
    /// Returns `Ok(None)` when the part is absent from the key (`present` is
    /// false), when its null indicator is set, or when its width is not
    /// decodable for its kind. A present part whose window runs past the end
    /// of `key` is an error, as is a descriptor that fails [`KeyPart::check`].
    pub fn decode(
        &mut self,
        part: &KeyPart,
        key: &[u8],
        present: bool,
    ) -> KeyResult<Option<TypedValue>> {
        part.check()?;
        if !present {
            return Ok(None);
        }
        let window = key
            .get(..part.store_length)
            .ok_or_else(|| KeyError::buffer_truncated(&part.field, part.store_length, key.len()))?;
        if part.is_null(window) {
            return Ok(None);
        }

        let bytes = part.value_bytes(window);
        let value = match part.kind {
            KeyKind::SignedInt => decode_signed(bytes),
            KeyKind::UnsignedInt => decode_unsigned(bytes),
            KeyKind::Float => decode_float(bytes),
            KeyKind::Text => Some(self.decode_text(bytes)),
            KeyKind::Unsupported => None,
        };
        Ok(value)
    }

    /// Text values are C strings: the content ends at the first NUL.
    fn decode_text(&mut self, bytes: &[u8]) -> TypedValue {
        let staged = self.scratch.stage_terminated(bytes);
        let end = staged.iter().position(|b| *b == 0).unwrap_or(staged.len());
        TypedValue::Utf8(staged[..end].to_vec())
    }
}

/// Fixed-size copy of a value slice whose length was matched by the caller
fn array<const N: usize>(bytes: &[u8]) -> Option<[u8; N]> {
    bytes.try_into().ok()
}

fn decode_signed(bytes: &[u8]) -> Option<TypedValue> {
    let value = match bytes.len() {
        1 => i64::from(i8::from_le_bytes(array(bytes)?)),
        2 => i64::from(i16::from_le_bytes(array(bytes)?)),
        3 => {
            // Two's-complement extension of the 24-bit value into 32 bits
            let fill = if bytes[2] & 0x80 != 0 { 0xFF } else { 0x00 };
            i64::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], fill]))
        }
        4 => i64::from(i32::from_le_bytes(array(bytes)?)),
        8 => i64::from_le_bytes(array(bytes)?),
        _ => return None,
    };
    Some(TypedValue::SignedInt64(value))
}

fn decode_unsigned(bytes: &[u8]) -> Option<TypedValue> {
    let value = match bytes.len() {
        1 => u64::from(u8::from_le_bytes(array(bytes)?)),
        2 => u64::from(u16::from_le_bytes(array(bytes)?)),
        // 24-bit values are zero-extended
        3 => u64::from(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])),
        4 => u64::from(u32::from_le_bytes(array(bytes)?)),
        8 => {
            // Patterns with the top bit set are dropped, unlike the narrower
            // widths. Downstream range semantics rely on this.
            let raw = i64::from_le_bytes(array(bytes)?);
            if raw < 0 {
                return None;
            }
            raw as u64
        }
        _ => return None,
    };
    Some(TypedValue::UnsignedInt64(value))
}

fn decode_float(bytes: &[u8]) -> Option<TypedValue> {
    let value = match bytes.len() {
        4 => f64::from(f32::from_le_bytes(array(bytes)?)),
        8 => f64::from_le_bytes(array(bytes)?),
        _ => return None,
    };
    Some(TypedValue::Double(value))
}
