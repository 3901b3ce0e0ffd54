//! docbridge - Row/document translation core
//!
//! Bridges a fixed-schema relational row representation and the
//! schema-flexible document model of an underlying store:
//!
//! - `codec`: rows to documents and back, field by field
//! - `key` + `filter`: packed index key ranges to document query filters
//! - `store`: the collaborator boundary (insert/update/delete/query/cursor)
//! - `handler`: row-level table operations wired over a store

pub mod codec;
pub mod config;
pub mod filter;
pub mod handler;
pub mod key;
pub mod observability;
pub mod row;
pub mod schema;
pub mod store;
pub mod value;
