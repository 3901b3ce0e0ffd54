//! Per-context row codec state

use crate::config::{BridgeConfig, DateTimeEncoding, TimeZoneSetting};
use crate::row::Row;
use crate::schema::TableDef;

use super::errors::{CodecError, CodecResult};
use super::scratch::ScratchBuffer;

/// Converts rows of one table to documents and back.
///
/// One codec per handler context. It owns the context's scratch buffer, so
/// it is `Send` but must not be shared between contexts.
#[derive(Debug)]
pub struct RowCodec {
    pub(super) scratch: ScratchBuffer,
    pub(super) field_max_len: usize,
    pub(super) time_zone: TimeZoneSetting,
    pub(super) datetime_encoding: DateTimeEncoding,
}

impl RowCodec {
    pub fn new(config: &BridgeConfig) -> Self {
        Self {
            scratch: ScratchBuffer::new(config.scratch_step),
            field_max_len: config.field_max_len,
            time_zone: config.time_zone,
            datetime_encoding: config.datetime_encoding,
        }
    }

    pub fn scratch(&self) -> &ScratchBuffer {
        &self.scratch
    }

    /// The scratch buffer, for key decoding in the same context
    pub fn scratch_mut(&mut self) -> &mut ScratchBuffer {
        &mut self.scratch
    }

    pub fn time_zone(&self) -> TimeZoneSetting {
        self.time_zone
    }

    pub fn datetime_encoding(&self) -> DateTimeEncoding {
        self.datetime_encoding
    }
}

impl Default for RowCodec {
    fn default() -> Self {
        Self::new(&BridgeConfig::default())
    }
}

/// Rows must carry exactly one slot per declared field
pub(super) fn check_width(table: &TableDef, row: &Row) -> CodecResult<()> {
    if row.len() != table.fields.len() {
        return Err(CodecError::value_invalid(
            &table.name,
            format!(
                "row has {} fields, table declares {}",
                row.len(),
                table.fields.len()
            ),
        ));
    }
    Ok(())
}
