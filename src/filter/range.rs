//! Index key ranges -> compound filters
//!
//! Walks the key parts of one index in order, feeding each part's window
//! from the start and end key buffers to the `PredicateBuilder`. Bit `i` of
//! a range's part map says whether part `i` is present in that key; the
//! walk stops as soon as neither map addresses a further part.

use crate::codec::ScratchBuffer;
use crate::key::{KeyError, KeyResult};
use crate::observability::{Logger, Severity};
use crate::schema::IndexDef;

use super::ast::CompoundFilter;
use super::builder::{BoundWindow, FindMode, PredicateBuilder};

/// One bound of an index range: packed key bytes plus the present-parts map
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyRange {
    pub key: Vec<u8>,
    pub part_map: u64,
}

impl KeyRange {
    pub fn new(key: Vec<u8>, part_map: u64) -> Self {
        Self { key, part_map }
    }

    /// A range over the first `parts` key parts
    pub fn prefix(key: Vec<u8>, parts: u32) -> Self {
        let part_map = if parts >= u64::BITS {
            u64::MAX
        } else {
            (1_u64 << parts) - 1
        };
        Self { key, part_map }
    }
}

/// Per-bound walk position
struct BoundCursor<'a> {
    key: &'a [u8],
    offset: usize,
    map: u64,
}

impl<'a> BoundCursor<'a> {
    fn new(range: Option<&'a KeyRange>) -> Self {
        match range {
            Some(r) => Self {
                key: &r.key,
                offset: 0,
                map: r.part_map,
            },
            None => Self {
                key: &[],
                offset: 0,
                map: 0,
            },
        }
    }

    fn window(&self) -> BoundWindow<'a> {
        if self.map & 1 == 0 {
            return BoundWindow::absent();
        }
        BoundWindow::new(self.key.get(self.offset..).unwrap_or(&[]), true)
    }

    fn advance(&mut self, store_length: usize) {
        self.offset += store_length;
        self.map >>= 1;
    }
}

/// Translates key ranges of a table's indexes into document filters.
pub struct RangeTranslator<'s> {
    builder: PredicateBuilder<'s>,
}

impl<'s> RangeTranslator<'s> {
    pub fn new(scratch: &'s mut ScratchBuffer) -> Self {
        Self {
            builder: PredicateBuilder::new(scratch),
        }
    }

    /// Builds the filter for `start..=end` on index `ordinal`.
    ///
    /// Fails with `BRIDGE_INDEX_NOT_FOUND` when the ordinal does not name a
    /// declared index. An index without key part descriptors, or two bounds
    /// addressing no parts, yields the match-all filter.
    pub fn translate(
        &mut self,
        indexes: &[IndexDef],
        ordinal: usize,
        start: Option<&KeyRange>,
        end: Option<&KeyRange>,
        mode: FindMode,
    ) -> KeyResult<CompoundFilter> {
        let index = indexes
            .get(ordinal)
            .ok_or_else(|| KeyError::index_not_found(ordinal, indexes.len()))?;

        let mut filter = CompoundFilter::new();
        let Some(parts) = index.parts.as_deref() else {
            return Ok(filter);
        };

        let mut start = BoundCursor::new(start);
        let mut end = BoundCursor::new(end);

        for part in parts {
            if start.map | end.map == 0 {
                break;
            }
            if let Some(predicate) = self
                .builder
                .build(part, start.window(), end.window(), mode)?
            {
                filter.insert(part.field.clone(), predicate);
            }
            start.advance(part.store_length);
            end.advance(part.store_length);
        }

        if Logger::is_enabled(Severity::Trace) {
            let filter_json = filter.to_json().to_string();
            Logger::trace(
                "RANGE_TRANSLATED",
                &[("index", index.name.as_str()), ("filter", filter_json.as_str())],
            );
        }
        Ok(filter)
    }
}
