//! In-memory document store
//!
//! Reference implementation of the store boundary:
//! - `_id` is a UUID string assigned on insert
//! - filters are evaluated with `FilterMatcher`
//! - cursors iterate a snapshot taken at query time
//! - every call is counted; a failure can be injected for the next call

use std::sync::{Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::filter::{CompoundFilter, FilterMatcher};
use crate::value::{Document, TypedValue, ID_FIELD};

use super::errors::{StoreError, StoreResult};
use super::{DocumentCursor, DocumentStore};

#[derive(Debug, Default)]
struct StoreState {
    docs: Vec<Document>,
    operations: u64,
    fail_next: Option<StoreError>,
}

/// Thread-safe in-memory collection
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Counts the call and consumes an injected failure, if any
    fn begin(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        let mut state = self.lock();
        state.operations += 1;
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }

    /// Makes the next store call fail with `err`
    pub fn fail_next(&self, err: StoreError) {
        self.lock().fail_next = Some(err);
    }

    /// Number of store calls so far, failed ones included
    pub fn operation_count(&self) -> u64 {
        self.lock().operations
    }

    pub fn len(&self) -> usize {
        self.lock().docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().docs.is_empty()
    }

    /// Copy of every stored document, in insertion order
    pub fn documents(&self) -> Vec<Document> {
        self.lock().docs.clone()
    }
}

impl DocumentStore for MemoryStore {
    type Cursor = MemoryCursor;

    fn insert(&self, mut doc: Document) -> StoreResult<()> {
        let mut state = self.begin()?;
        if !doc.contains_key(ID_FIELD) {
            doc.insert(ID_FIELD, TypedValue::utf8(Uuid::new_v4().to_string()));
        }
        state.docs.push(doc);
        Ok(())
    }

    fn update(&self, filter: &CompoundFilter, doc: Document) -> StoreResult<()> {
        let mut state = self.begin()?;
        for existing in state
            .docs
            .iter_mut()
            .filter(|d| FilterMatcher::matches(d, filter))
        {
            let mut replacement = Document::with_capacity(doc.len() + 1);
            if let Some(id) = existing.get(ID_FIELD) {
                replacement.insert(ID_FIELD, id.clone());
            }
            for (name, value) in doc.iter().filter(|(name, _)| *name != ID_FIELD) {
                replacement.insert(name, value.clone());
            }
            *existing = replacement;
        }
        Ok(())
    }

    fn delete(&self, filter: &CompoundFilter) -> StoreResult<()> {
        let mut state = self.begin()?;
        state.docs.retain(|d| !FilterMatcher::matches(d, filter));
        Ok(())
    }

    fn query(&self, filter: &CompoundFilter) -> StoreResult<MemoryCursor> {
        let state = self.begin()?;
        let docs = state
            .docs
            .iter()
            .filter(|d| FilterMatcher::matches(d, filter))
            .cloned()
            .collect();
        Ok(MemoryCursor::new(docs))
    }

    fn truncate(&self) -> StoreResult<()> {
        let mut state = self.begin()?;
        state.docs.clear();
        Ok(())
    }
}

/// Cursor over a query-time snapshot
#[derive(Debug)]
pub struct MemoryCursor {
    docs: Vec<Document>,
    /// Index of the current document; `None` before the first `next`
    pos: Option<usize>,
}

impl MemoryCursor {
    fn new(docs: Vec<Document>) -> Self {
        Self { docs, pos: None }
    }

    /// Documents not yet returned
    pub fn remaining(&self) -> usize {
        let consumed = self.pos.map_or(0, |p| p + 1);
        self.docs.len().saturating_sub(consumed)
    }
}

impl DocumentCursor for MemoryCursor {
    fn next(&mut self) -> StoreResult<Document> {
        let next = self.pos.map_or(0, |p| p + 1);
        if next >= self.docs.len() {
            self.pos = Some(self.docs.len());
            return Err(StoreError::EndOfCursor);
        }
        self.pos = Some(next);
        Ok(self.docs[next].clone())
    }

    fn current(&self) -> StoreResult<Document> {
        self.pos
            .and_then(|p| self.docs.get(p))
            .cloned()
            .ok_or(StoreError::NoCurrentDocument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FieldPredicate;

    fn person(name: &str, age: i64) -> Document {
        Document::new()
            .with("name", TypedValue::utf8(name))
            .with("age", TypedValue::SignedInt64(age))
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert(person("alice", 30)).unwrap();
        store.insert(person("bob", 25)).unwrap();
        store.insert(person("carol", 41)).unwrap();
        store
    }

    fn drain(mut cursor: MemoryCursor) -> Vec<Document> {
        let mut out = Vec::new();
        loop {
            match cursor.next() {
                Ok(doc) => out.push(doc),
                Err(StoreError::EndOfCursor) => return out,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }
    }

    #[test]
    fn test_insert_assigns_unique_ids() {
        let store = seeded();
        let docs = store.documents();
        assert_eq!(docs.len(), 3);
        assert!(docs.iter().all(|d| d.contains_key(ID_FIELD)));
        assert_ne!(docs[0].get(ID_FIELD), docs[1].get(ID_FIELD));
    }

    #[test]
    fn test_query_with_range_filter() {
        let store = seeded();
        let mut filter = CompoundFilter::new();
        filter.insert(
            "age",
            FieldPredicate::Range {
                lower: TypedValue::SignedInt64(26),
                upper: TypedValue::SignedInt64(41),
            },
        );
        let docs = drain(store.query(&filter).unwrap());
        let names: Vec<_> = docs.iter().filter_map(|d| d.get("name")?.as_str()).collect();
        assert_eq!(names, vec!["alice", "carol"]);
    }

    #[test]
    fn test_cursor_current_and_exhaustion() {
        let store = seeded();
        let mut cursor = store.query(&CompoundFilter::new()).unwrap();
        assert_eq!(cursor.current(), Err(StoreError::NoCurrentDocument));
        assert_eq!(cursor.remaining(), 3);

        let first = cursor.next().unwrap();
        assert_eq!(cursor.current().unwrap(), first);
        assert_eq!(cursor.remaining(), 2);

        cursor.next().unwrap();
        cursor.next().unwrap();
        assert_eq!(cursor.next(), Err(StoreError::EndOfCursor));
        assert_eq!(cursor.next(), Err(StoreError::EndOfCursor));
        assert_eq!(cursor.current(), Err(StoreError::NoCurrentDocument));
    }

    #[test]
    fn test_cursor_is_a_snapshot() {
        let store = seeded();
        let cursor = store.query(&CompoundFilter::new()).unwrap();
        store.truncate().unwrap();
        assert_eq!(drain(cursor).len(), 3);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_replaces_fields_keeps_id() {
        let store = seeded();
        let bob = CompoundFilter::eq("name", TypedValue::utf8("bob"));
        let before = drain(store.query(&bob).unwrap()).remove(0);

        store
            .update(&bob, Document::new().with("name", TypedValue::utf8("robert")))
            .unwrap();

        let robert = CompoundFilter::eq("name", TypedValue::utf8("robert"));
        let after = drain(store.query(&robert).unwrap()).remove(0);
        assert_eq!(after.get(ID_FIELD), before.get(ID_FIELD));
        assert!(!after.contains_key("age"));
    }

    #[test]
    fn test_delete_by_filter() {
        let store = seeded();
        let mut older = CompoundFilter::new();
        older.insert("age", FieldPredicate::Gte(TypedValue::SignedInt64(30)));
        store.delete(&older).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_injected_failure_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next(StoreError::Unavailable("down".into()));

        assert_eq!(
            store.insert(person("x", 1)),
            Err(StoreError::Unavailable("down".into()))
        );
        assert!(store.is_empty());
        assert!(store.insert(person("x", 1)).is_ok());
        assert_eq!(store.operation_count(), 2);
    }
}
