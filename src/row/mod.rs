//! Relational row representation

mod bitmap;
mod row;

pub use bitmap::NullBitmap;
pub use row::{FieldValue, Row};
