//! Null-presence bitmap

/// One bit per field; a set bit means the field is NULL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NullBitmap {
    bits: Vec<u8>,
    len: usize,
}

impl NullBitmap {
    /// Creates a bitmap for `len` fields, all non-null
    pub fn with_len(len: usize) -> Self {
        Self {
            bits: vec![0; len.div_ceil(8)],
            len,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Out-of-range positions read as non-null
    pub fn is_set(&self, pos: usize) -> bool {
        pos < self.len && self.bits[pos / 8] & (1 << (pos % 8)) != 0
    }

    pub fn set(&mut self, pos: usize) {
        if pos < self.len {
            self.bits[pos / 8] |= 1 << (pos % 8);
        }
    }

    pub fn clear(&mut self, pos: usize) {
        if pos < self.len {
            self.bits[pos / 8] &= !(1 << (pos % 8));
        }
    }

    /// Marks every field non-null
    pub fn clear_all(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = 0);
    }

    /// Raw bitmap bytes, least significant bit first
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }
}
