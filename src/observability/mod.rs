//! Observability for the bridge
//!
//! - Structured JSON logging with a process-wide minimum severity
//! - Per-table counters
//!
//! Observability is read-only: nothing here changes conversion results.
//!
//! ```ignore
//! use docbridge::observability::{BridgeMetrics, Logger};
//!
//! Logger::info("TABLE_OPEN", &[("table", "users")]);
//!
//! let metrics = BridgeMetrics::new();
//! metrics.increment_rows_encoded();
//! ```

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{BridgeMetrics, MetricsSnapshot};
