//! Persistence layer: day-partitioned append-only record files.
//!
//! Three leaf pieces the [`PaymentLedger`](crate::service::PaymentLedger)
//! composes: partition path resolution, the newline-delimited JSON codec,
//! and the in-process per-path mutex that serializes read-modify-write
//! cycles.

pub mod codec;
pub mod mutex;
pub mod partition;

pub use mutex::{PathGuard, PathMutex};
