//! Document store boundary
//!
//! The bridge reaches the store only through `DocumentStore` and
//! `DocumentCursor`. Calls are blocking and failures propagate immediately.

mod errors;
mod memory;

pub use errors::{StoreError, StoreResult};
pub use memory::{MemoryCursor, MemoryStore};

use std::sync::Arc;

use crate::filter::CompoundFilter;
use crate::value::Document;

/// Collection-level operations of the document store
pub trait DocumentStore {
    type Cursor: DocumentCursor;

    fn insert(&self, doc: Document) -> StoreResult<()>;

    /// Replaces the fields of every document matching `filter`
    fn update(&self, filter: &CompoundFilter, doc: Document) -> StoreResult<()>;

    fn delete(&self, filter: &CompoundFilter) -> StoreResult<()>;

    /// Opens a cursor over the documents matching `filter`
    fn query(&self, filter: &CompoundFilter) -> StoreResult<Self::Cursor>;

    /// Removes every document
    fn truncate(&self) -> StoreResult<()>;
}

/// Forward-only cursor over query results
pub trait DocumentCursor {
    /// Advances and returns the next document; `EndOfCursor` at exhaustion
    fn next(&mut self) -> StoreResult<Document>;

    /// The document the cursor is positioned on
    fn current(&self) -> StoreResult<Document>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    type Cursor = T::Cursor;

    fn insert(&self, doc: Document) -> StoreResult<()> {
        (**self).insert(doc)
    }

    fn update(&self, filter: &CompoundFilter, doc: Document) -> StoreResult<()> {
        (**self).update(filter, doc)
    }

    fn delete(&self, filter: &CompoundFilter) -> StoreResult<()> {
        (**self).delete(filter)
    }

    fn query(&self, filter: &CompoundFilter) -> StoreResult<Self::Cursor> {
        (**self).query(filter)
    }

    fn truncate(&self) -> StoreResult<()> {
        (**self).truncate()
    }
}
