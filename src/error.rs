//! Ledger error types with retry classification.
//!
//! [`LedgerError`] is the central error type for the ledger. Webhook
//! callers use [`LedgerError::is_retryable`] to decide whether to answer
//! the upstream payment provider with a retryable status (so the event is
//! redelivered) or to treat the failure as a partition invariant violation.

use std::path::PathBuf;

/// Failures surfaced by the ledger.
///
/// Duplicate events are **not** represented here: an idempotency hit is a
/// normal, successful outcome of
/// [`write_atomic`](crate::service::PaymentLedger::write_atomic). A missing
/// partition file on the read side is likewise not an error; it reads as an
/// empty partition.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Transient I/O failure (disk full, permission denied, directory
    /// vanished mid-operation). The partition file is left untouched;
    /// callers should have the provider redeliver the webhook.
    #[error("ledger i/o failure on {path}: {source}")]
    Io {
        /// File or directory the failed operation targeted.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// A partition file contains a line that is not a complete JSON
    /// record. Fatal for every read touching that partition: the
    /// atomic-write discipline makes this unreachable in normal operation,
    /// so a hit signals an upstream bug, never a condition to recover from.
    #[error("malformed ledger record at {path} line {line}: {source}")]
    MalformedRecord {
        /// Partition file containing the bad line.
        path: PathBuf,
        /// 1-based line number of the unparseable record.
        line: usize,
        /// Underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be serialized to its on-disk line.
    #[error("payment record serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl LedgerError {
    /// Returns `true` when the caller should respond to the upstream
    /// provider with a retryable status so the webhook is redelivered.
    ///
    /// Only transient I/O failures qualify. Malformed partitions and
    /// serialization failures are invariant violations; redelivery would
    /// hit the same condition again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Wraps an [`std::io::Error`] with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_retryable() {
        let err = LedgerError::io(
            "/data/payments/payments-2024-11-10.json",
            std::io::Error::other("disk full"),
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn malformed_records_are_not_retryable() {
        let Err(source) = serde_json::from_str::<serde_json::Value>("{not json") else {
            panic!("expected parse failure");
        };
        let err = LedgerError::MalformedRecord {
            path: PathBuf::from("/data/payments/payments-2024-11-10.json"),
            line: 3,
            source,
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn display_includes_path_and_line() {
        let Err(source) = serde_json::from_str::<serde_json::Value>("oops") else {
            panic!("expected parse failure");
        };
        let err = LedgerError::MalformedRecord {
            path: PathBuf::from("/tmp/payments-2024-11-10.json"),
            line: 7,
            source,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("payments-2024-11-10.json"));
        assert!(rendered.contains("line 7"));
    }
}
