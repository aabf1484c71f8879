//! Domain layer: the payment record model.
//!
//! This module contains the ledger's data model: the immutable
//! [`PaymentRecord`] handed in by the webhook handler and the decorated
//! [`StoredPaymentRecord`] the write path returns (record plus on-disk
//! location).

pub mod payment_record;

pub use payment_record::{PaymentRecord, StoredPaymentRecord};
