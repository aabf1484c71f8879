//! # payment-ledger
//!
//! Append-only, idempotent payment ledger with atomic day-partitioned
//! file writes.
//!
//! This crate is the secondary record store for payment webhook events:
//! the webhook handler writes each confirmed event here alongside the
//! primary database, giving the platform an audit trail and an
//! idempotency check that survive primary-store hiccups. One file per UTC
//! day, one JSON record per line, replaced wholesale through a
//! temp-write-then-rename so readers never observe a torn file.
//!
//! ## Architecture
//!
//! ```text
//! Webhook handler / panel backend (out of scope)
//!     │
//!     ├── PaymentLedger (service/)
//!     │       │
//!     │       ├── PathMutex        (persistence/mutex)
//!     │       ├── partition paths  (persistence/partition)
//!     │       └── JSONL codec      (persistence/codec)
//!     │
//!     └── <base-dir>/payments-YYYY-MM-DD.json
//! ```
//!
//! The in-process [`PathMutex`](persistence::PathMutex) serializes
//! read-modify-write cycles per partition within one process. It is not a
//! cross-process lock: horizontally scaled deployments rely on the
//! primary database's unique constraint for idempotency, with this ledger
//! as an audit mirror.

pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
