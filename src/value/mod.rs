//! Document-side value model
//!
//! A `Document` is an ordered name -> `TypedValue` mapping, the native record
//! shape of the document store. An absent key is the relational NULL.

mod document;
mod typed;

pub use document::Document;
pub use typed::{Timestamp, TypedValue};

/// Name of the store-assigned document identifier field
pub const ID_FIELD: &str = "_id";
