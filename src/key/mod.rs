//! Packed index key decoding
//!
//! Key parts are fixed-width segments of a composite index key. The decoder
//! turns one part's bytes into a `TypedValue` for predicate building.

mod decoder;
mod errors;
mod part;

pub use decoder::KeyPartDecoder;
pub use errors::{KeyError, KeyErrorCode, KeyResult};
pub use part::{KeyKind, KeyPart, MAX_NUMERIC_WIDTH};
