//! Key ranges and pushed conditions as document filters
//!
//! - `CompoundFilter` / `FieldPredicate`: the query shape sent to the store
//! - `PredicateBuilder`: one key part's bounds -> one field predicate
//! - `RangeTranslator`: a composite index range -> compound filter
//! - `FilterMatcher`: evaluates filters in process

mod ast;
mod builder;
mod matcher;
mod range;

pub use ast::{CompoundFilter, FieldPredicate, OP_EQ, OP_GTE, OP_LTE};
pub use builder::{BoundWindow, FindMode, PredicateBuilder};
pub use matcher::FilterMatcher;
pub use range::{KeyRange, RangeTranslator};
