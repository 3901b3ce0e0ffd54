//! Row <-> document codec
//!
//! Field-by-field conversion between caller-owned relational rows and
//! documents:
//! - encode dispatches on the declared column type
//! - decode dispatches on the document value's variant, then converts into
//!   the declared column type
//! - variable-length values are staged through a per-context `ScratchBuffer`
//!
//! Every failure names the offending field and aborts the row.

mod decimal;
mod decode;
mod encode;
mod errors;
mod row_codec;
mod scratch;
mod target;
mod temporal;

pub use decimal::{canonical_decimal, DecimalColumn, DecimalFit};
pub use errors::{CodecError, CodecErrorCode, CodecResult};
pub use row_codec::RowCodec;
pub use scratch::{ScratchBuffer, DEFAULT_STEP};
pub use temporal::{epoch_to_local, local_to_epoch};
