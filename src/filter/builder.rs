//! Single-field predicates from key bounds

use crate::codec::ScratchBuffer;
use crate::key::{KeyPart, KeyPartDecoder, KeyResult};

use super::ast::FieldPredicate;

/// Whether a key lookup asks for an exact match or a bounded range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindMode {
    Exact,
    Range,
}

/// One bound's view of a key part: the bytes from the head of the part's
/// window onward, and whether the part is present in that bound.
#[derive(Debug, Clone, Copy)]
pub struct BoundWindow<'a> {
    pub bytes: &'a [u8],
    pub present: bool,
}

impl<'a> BoundWindow<'a> {
    pub fn new(bytes: &'a [u8], present: bool) -> Self {
        Self { bytes, present }
    }

    /// A bound that does not address this part
    pub fn absent() -> Self {
        Self {
            bytes: &[],
            present: false,
        }
    }
}

/// Builds the predicate one key part contributes to a filter.
pub struct PredicateBuilder<'s> {
    decoder: KeyPartDecoder<'s>,
}

impl<'s> PredicateBuilder<'s> {
    pub fn new(scratch: &'s mut ScratchBuffer) -> Self {
        Self {
            decoder: KeyPartDecoder::new(scratch),
        }
    }

    /// Exact mode decodes only the start bound into an equality term. Range
    /// mode decodes each bound independently into `$gte` / `$lte` terms.
    ///
    /// `None` when no term applies: bound absent, null, or width not
    /// decodable.
    pub fn build(
        &mut self,
        part: &KeyPart,
        start: BoundWindow<'_>,
        end: BoundWindow<'_>,
        mode: FindMode,
    ) -> KeyResult<Option<FieldPredicate>> {
        match mode {
            FindMode::Exact => Ok(self
                .decoder
                .decode(part, start.bytes, start.present)?
                .map(FieldPredicate::Eq)),
            FindMode::Range => {
                let lower = self.decoder.decode(part, start.bytes, start.present)?;
                let upper = self.decoder.decode(part, end.bytes, end.present)?;
                Ok(FieldPredicate::from_bounds(lower, upper))
            }
        }
    }
}
