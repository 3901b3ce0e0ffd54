//! Table handler and shared per-table state
//!
//! A `TableHandler` is the per-context entry point the relational engine
//! calls: row writes, positioned updates and deletes, index reads and full
//! scans. Handlers on the same table share a `TableShare` through the
//! `ShareRegistry`.

mod errors;
mod share;
mod table;

pub use errors::{HandlerError, HandlerResult};
pub use share::{ShareGuard, ShareRegistry, TableShare};
pub use table::TableHandler;
