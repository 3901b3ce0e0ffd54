//! Row-level table handler over a document store
//!
//! Drives the codec and the range translator for one open table:
//! - writes encode the row before any store call
//! - index reads translate the key range (or use a pushed condition)
//! - scans and lookups decode each fetched document into the caller's row
//!
//! One handler per execution context; calls are blocking and sequential.

use crate::codec::{CodecError, RowCodec};
use crate::config::BridgeConfig;
use crate::filter::{CompoundFilter, FindMode, KeyRange, RangeTranslator};
use crate::key::KeyError;
use crate::observability::{BridgeMetrics, Logger};
use crate::row::Row;
use crate::schema::TableDef;
use crate::store::{DocumentCursor, DocumentStore, StoreError};
use crate::value::{Document, TypedValue, ID_FIELD};

use super::errors::{HandlerError, HandlerResult};
use super::share::{ShareGuard, ShareRegistry};

/// An open table bound to a document store
pub struct TableHandler<S: DocumentStore> {
    table: TableDef,
    store: S,
    codec: RowCodec,
    share: ShareGuard,
    cursor: Option<S::Cursor>,
    /// Last document fetched; target of positioned update/delete
    current: Option<Document>,
    active_index: Option<usize>,
    end_range: Option<KeyRange>,
    condition: Option<CompoundFilter>,
    reported_grows: u64,
}

impl<S: DocumentStore> TableHandler<S> {
    /// Opens `table` against `store`, acquiring its share in `registry`
    pub fn open(
        registry: &ShareRegistry,
        table: TableDef,
        store: S,
        config: &BridgeConfig,
    ) -> HandlerResult<Self> {
        table
            .validate_structure()
            .map_err(HandlerError::InvalidTable)?;

        let share = registry.acquire(&table.name);
        let open = share.share().name().to_string();
        let handles = registry.open_count(&table.name).to_string();
        Logger::info(
            "TABLE_OPEN",
            &[("table", open.as_str()), ("handles", handles.as_str())],
        );

        Ok(Self {
            table,
            store,
            codec: RowCodec::new(config),
            share,
            cursor: None,
            current: None,
            active_index: None,
            end_range: None,
            condition: None,
            reported_grows: 0,
        })
    }

    /// Releases the table share
    pub fn close(self) {
        Logger::info("TABLE_CLOSE", &[("table", self.table.name.as_str())]);
    }

    pub fn table(&self) -> &TableDef {
        &self.table
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Counters shared by every handler open on this table
    pub fn metrics(&self) -> &BridgeMetrics {
        self.share.metrics()
    }

    // ==================
    // Writes
    // ==================

    /// Encodes `row` and inserts it
    pub fn write_row(&mut self, row: &Row) -> HandlerResult<()> {
        let doc = self.encode(row)?;
        let result = self.store.insert(doc);
        self.store_call("insert", result)
    }

    /// Replaces the current document with `row`
    pub fn update_row(&mut self, row: &Row) -> HandlerResult<()> {
        let filter = self.current_identity()?;
        let doc = self.encode(row)?;
        let result = self.store.update(&filter, doc);
        self.store_call("update", result)
    }

    /// Deletes the current document
    pub fn delete_row(&mut self) -> HandlerResult<()> {
        let filter = self.current_identity()?;
        let result = self.store.delete(&filter);
        self.store_call("delete", result)?;
        self.current = None;
        Ok(())
    }

    pub fn delete_all_rows(&mut self) -> HandlerResult<()> {
        let result = self.store.truncate();
        self.store_call("truncate", result)?;
        self.cursor = None;
        self.current = None;
        Ok(())
    }

    // ==================
    // Index reads
    // ==================

    /// Selects index `ordinal` for subsequent reads
    pub fn index_init(&mut self, ordinal: usize) -> HandlerResult<()> {
        if ordinal >= self.table.indexes.len() {
            return Err(KeyError::index_not_found(ordinal, self.table.indexes.len()).into());
        }
        self.active_index = Some(ordinal);
        self.cursor = None;
        Ok(())
    }

    pub fn index_end(&mut self) {
        self.active_index = None;
        self.end_range = None;
        self.cursor = None;
    }

    /// Upper bound applied by the next range read; `None` clears it
    pub fn set_end_range(&mut self, end: Option<KeyRange>) {
        self.end_range = end;
    }

    /// Positions on the first row matching `key` and decodes it into `row`.
    ///
    /// A pushed condition replaces the key range for this one read.
    pub fn index_read(
        &mut self,
        row: &mut Row,
        key: Option<&KeyRange>,
        mode: FindMode,
    ) -> HandlerResult<()> {
        let ordinal = self.active_index.ok_or(HandlerError::NoActiveIndex)?;

        let filter = match self.condition.take().filter(|c| !c.is_empty()) {
            Some(condition) => condition,
            None => {
                let filter = RangeTranslator::new(self.codec.scratch_mut()).translate(
                    &self.table.indexes,
                    ordinal,
                    key,
                    self.end_range.as_ref(),
                    mode,
                )?;
                self.share.metrics().increment_filters_translated();
                filter
            }
        };

        self.open_cursor(&filter)?;
        self.fetch_next(row, HandlerError::KeyNotFound)
    }

    /// Decodes the next row of the current index read
    pub fn index_next(&mut self, row: &mut Row) -> HandlerResult<()> {
        if self.active_index.is_none() {
            return Err(HandlerError::NoActiveIndex);
        }
        self.fetch_next(row, HandlerError::EndOfData)
    }

    // ==================
    // Table scans
    // ==================

    /// Starts a full scan, restricted by a pushed condition if any
    pub fn rnd_init(&mut self) -> HandlerResult<()> {
        let filter = self.condition.take().unwrap_or_default();
        self.open_cursor(&filter)
    }

    pub fn rnd_next(&mut self, row: &mut Row) -> HandlerResult<()> {
        self.fetch_next(row, HandlerError::EndOfData)
    }

    pub fn rnd_end(&mut self) {
        self.cursor = None;
    }

    /// `_id` of the current row
    pub fn position(&self) -> HandlerResult<TypedValue> {
        self.current
            .as_ref()
            .and_then(|doc| doc.get(ID_FIELD))
            .cloned()
            .ok_or(HandlerError::NoCurrentRow)
    }

    /// Re-reads the row saved by [`TableHandler::position`]
    pub fn rnd_pos(&mut self, row: &mut Row, id: &TypedValue) -> HandlerResult<()> {
        let filter = CompoundFilter::eq(ID_FIELD, id.clone());
        self.open_cursor(&filter)?;
        self.fetch_next(row, HandlerError::KeyNotFound)
    }

    /// Decodes the document the store cursor is positioned on
    pub fn current_row(&mut self, row: &mut Row) -> HandlerResult<()> {
        let cursor = self.cursor.as_ref().ok_or(HandlerError::NoActiveScan)?;
        let doc = match cursor.current() {
            Ok(doc) => doc,
            Err(StoreError::NoCurrentDocument) => return Err(HandlerError::NoCurrentRow),
            Err(e) => return Err(self.store_failed("current", e)),
        };
        self.decode(&doc, row)?;
        self.current = Some(doc);
        Ok(())
    }

    /// Pushes a filter to use for the next index read or scan
    pub fn push_condition(&mut self, condition: CompoundFilter) {
        self.condition = Some(condition);
    }

    // ==================
    // Internals
    // ==================

    fn open_cursor(&mut self, filter: &CompoundFilter) -> HandlerResult<()> {
        self.cursor = None;
        self.current = None;
        let result = self.store.query(filter);
        self.cursor = Some(self.store_call("query", result)?);
        Ok(())
    }

    fn fetch_next(&mut self, row: &mut Row, on_end: HandlerError) -> HandlerResult<()> {
        let cursor = self.cursor.as_mut().ok_or(HandlerError::NoActiveScan)?;
        let doc = match cursor.next() {
            Ok(doc) => doc,
            Err(StoreError::EndOfCursor) => {
                self.current = None;
                return Err(on_end);
            }
            Err(e) => return Err(self.store_failed("next", e)),
        };
        self.decode(&doc, row)?;
        self.current = Some(doc);
        Ok(())
    }

    fn encode(&mut self, row: &Row) -> HandlerResult<Document> {
        let result = self.codec.encode(&self.table, row);
        self.report_scratch_growth();
        match result {
            Ok(doc) => {
                self.share.metrics().increment_rows_encoded();
                Ok(doc)
            }
            Err(e) => {
                self.share.metrics().increment_encode_failures();
                self.log_codec_failure("ROW_ENCODE_FAILED", &e);
                Err(e.into())
            }
        }
    }

    fn decode(&mut self, doc: &Document, row: &mut Row) -> HandlerResult<()> {
        match self.codec.decode(&self.table, doc, row) {
            Ok(()) => {
                self.share.metrics().increment_rows_decoded();
                Ok(())
            }
            Err(e) => {
                self.share.metrics().increment_decode_failures();
                self.log_codec_failure("ROW_DECODE_FAILED", &e);
                Err(e.into())
            }
        }
    }

    fn current_identity(&self) -> HandlerResult<CompoundFilter> {
        self.current
            .as_ref()
            .map(CompoundFilter::identity)
            .ok_or(HandlerError::NoCurrentRow)
    }

    fn store_call<T>(&self, op: &str, result: Result<T, StoreError>) -> HandlerResult<T> {
        result.map_err(|e| self.store_failed(op, e))
    }

    fn store_failed(&self, op: &str, err: StoreError) -> HandlerError {
        self.share.metrics().increment_store_failures();
        let message = err.to_string();
        Logger::error(
            "STORE_CALL_FAILED",
            &[
                ("table", self.table.name.as_str()),
                ("op", op),
                ("error", message.as_str()),
            ],
        );
        HandlerError::Store(err)
    }

    fn log_codec_failure(&self, event: &str, err: &CodecError) {
        let message = err.message().to_string();
        Logger::warn(
            event,
            &[
                ("table", self.table.name.as_str()),
                ("field", err.field()),
                ("code", err.code().code()),
                ("message", message.as_str()),
            ],
        );
    }

    fn report_scratch_growth(&mut self) {
        let grows = self.codec.scratch().grow_count();
        if grows > self.reported_grows {
            self.share
                .metrics()
                .add_scratch_grows(grows - self.reported_grows);
            self.reported_grows = grows;
        }
    }
}
