//! Service layer: the ledger entry points.
//!
//! [`PaymentLedger`] owns the configuration and the per-partition lock
//! table, and exposes the write/probe/query operations the webhook
//! handler and panel backend call.

pub mod ledger_service;

pub use ledger_service::{Clock, PaymentLedger};
