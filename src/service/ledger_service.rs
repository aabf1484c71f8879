//! Payment ledger service: idempotent atomic writes and partition queries.
//!
//! [`PaymentLedger`] is the one object callers hold. Every write follows
//! the same protocol: resolve the "now" partition → acquire the per-path
//! lock → read existing records → idempotency scan → append in memory →
//! write a temp sibling → rename over the partition. Readers never take
//! the lock; atomic renames guarantee they see either the pre-write or
//! the post-write file, never a torn one.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::LedgerConfig;
use crate::domain::{PaymentRecord, StoredPaymentRecord};
use crate::error::LedgerError;
use crate::persistence::{PathMutex, codec, partition};

/// Source of "now" for partition resolution.
///
/// Production ledgers use [`Utc::now`]; tests inject a fixed clock to pin
/// writes to a chosen day.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Append-only, idempotent payment record store.
///
/// One instance per process, constructed at startup and passed by
/// reference to all callers. The in-process lock table lives inside the
/// instance, so independent ledgers (e.g. in tests) never contend with
/// each other.
///
/// # Concurrency
///
/// - Writers to the same partition are fully serialized.
/// - Writers to different partitions run concurrently.
/// - Readers are never serialized against writers; a read concurrent with
///   a write observes the old or the new file state, never a partial one.
pub struct PaymentLedger {
    config: LedgerConfig,
    locks: PathMutex,
    clock: Clock,
}

impl PaymentLedger {
    /// Creates a ledger over the configured base directory, using the
    /// system UTC clock for partition resolution.
    #[must_use]
    pub fn new(config: LedgerConfig) -> Self {
        Self::with_clock(config, Arc::new(Utc::now))
    }

    /// Creates a ledger with an injected clock.
    ///
    /// Intended for tests and deterministic replay; everything else
    /// behaves exactly as [`PaymentLedger::new`].
    #[must_use]
    pub fn with_clock(config: LedgerConfig, clock: Clock) -> Self {
        Self {
            config,
            locks: PathMutex::new(),
            clock,
        }
    }

    /// Returns the ledger configuration.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Returns the partition path that holds (or would hold) records for
    /// the given instant, defaulting to "now".
    #[must_use]
    pub fn partition_path_for(&self, at: Option<DateTime<Utc>>) -> PathBuf {
        let at = at.unwrap_or_else(|| (self.clock)());
        partition::partition_path(&self.config.base_dir, at.date_naive())
    }

    /// Appends a payment record to today's partition, exactly once per
    /// `provider_payment_id`, durably and atomically.
    ///
    /// If a record with the same `provider_payment_id` already exists in
    /// the partition, nothing is written and the **existing** record is
    /// returned, decorated with its location — a duplicate webhook
    /// delivery is a successful outcome, which makes the operation safe
    /// to retry with the same input.
    ///
    /// Readers opening the partition at any point see the state before
    /// this write or the state after, never an intermediate state:
    /// replacement is a single rename of a fully-written temp sibling.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] on filesystem failure (the temp file,
    /// if created, is removed best-effort and the partition is left
    /// untouched), [`LedgerError::MalformedRecord`] if the existing
    /// partition cannot be parsed, or [`LedgerError::Serialize`] if the
    /// record cannot be encoded.
    pub async fn write_atomic(
        &self,
        record: PaymentRecord,
    ) -> Result<StoredPaymentRecord, LedgerError> {
        let path = self.partition_path_for(None);
        let _guard = self.locks.acquire(&path).await;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LedgerError::io(parent, source))?;
        }

        let mut records = codec::read_partition(&path).await?;

        if let Some((line_offset, existing)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.provider_payment_id == record.provider_payment_id)
        {
            tracing::warn!(
                provider_payment_id = %record.provider_payment_id,
                partition = %path.display(),
                line_offset,
                "duplicate payment event collapsed"
            );
            return Ok(StoredPaymentRecord {
                record: existing.clone(),
                filepath: path,
                line_offset,
            });
        }

        records.push(record.clone());
        let line_offset = records.len().saturating_sub(1);

        let temp = partition::temp_path(&path);
        if let Err(err) = persist(&path, &temp, &records).await {
            remove_temp_best_effort(&temp).await;
            return Err(err);
        }

        tracing::info!(
            record_id = %record.id,
            provider_payment_id = %record.provider_payment_id,
            partition = %path.display(),
            "payment record written atomically"
        );

        Ok(StoredPaymentRecord {
            record,
            filepath: path,
            line_offset,
        })
    }

    /// Checks whether a record with the given `provider_payment_id` is
    /// already persisted, without taking the partition lock.
    ///
    /// Defaults to today's partition; pass `partition` to probe a
    /// specific file. A missing partition reads as `false`. Because the
    /// lock is not taken, a probe racing an in-flight writer may return a
    /// false negative — the writer itself re-checks under lock, so this
    /// stays safe for short-circuiting duplicate work.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] or [`LedgerError::MalformedRecord`] if
    /// the partition exists but cannot be read.
    pub async fn record_exists(
        &self,
        provider_payment_id: &str,
        partition: Option<&Path>,
    ) -> Result<bool, LedgerError> {
        let path = match partition {
            Some(path) => path.to_path_buf(),
            None => self.partition_path_for(None),
        };
        let records = codec::read_partition(&path).await?;
        Ok(records
            .iter()
            .any(|r| r.provider_payment_id == provider_payment_id))
    }

    /// Reads every record from `start` to `end` inclusive, iterating one
    /// UTC calendar day at a time.
    ///
    /// Days with no partition file are silently skipped. Results are
    /// concatenated in day order, preserving within-day append order. An
    /// empty range (`start` after `end`) yields no records.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] or [`LedgerError::MalformedRecord`] if
    /// any existing partition in the range cannot be read; no partial
    /// results are returned.
    pub async fn read_payments_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PaymentRecord>, LedgerError> {
        let mut records = Vec::new();
        let mut day = start.date_naive();
        let last = end.date_naive();
        while day <= last {
            let path = partition::partition_path(&self.config.base_dir, day);
            let mut day_records = codec::read_partition(&path).await?;
            records.append(&mut day_records);
            let Some(next) = day.succ_opt() else { break };
            day = next;
        }
        Ok(records)
    }

    /// Reads a tenant's records over the given range, defaulting to a
    /// trailing window of [`LedgerConfig::tenant_window_days`] ending now.
    ///
    /// # Errors
    ///
    /// Propagates any failure from
    /// [`read_payments_by_date_range`](Self::read_payments_by_date_range).
    pub async fn read_payments_by_tenant(
        &self,
        tenant_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<PaymentRecord>, LedgerError> {
        let end = end.unwrap_or_else(|| (self.clock)());
        let start = start.unwrap_or_else(|| {
            end - chrono::Duration::days(i64::from(self.config.tenant_window_days))
        });

        let mut records = self.read_payments_by_date_range(start, end).await?;
        records.retain(|r| r.tenant_id == tenant_id);
        Ok(records)
    }

    /// Returns the last record appended to **today's** partition, or
    /// `None` if today has no writes yet.
    ///
    /// Prior days are intentionally not consulted: a caller that needs
    /// the true global latest when today is empty must fall back to
    /// another source. This mirrors how the panel backend polls for "the
    /// most recent payment today".
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] or [`LedgerError::MalformedRecord`] if
    /// today's partition exists but cannot be read.
    pub async fn latest_payment(&self) -> Result<Option<PaymentRecord>, LedgerError> {
        let path = self.partition_path_for(None);
        let mut records = codec::read_partition(&path).await?;
        Ok(records.pop())
    }
}

impl fmt::Debug for PaymentLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentLedger")
            .field("config", &self.config)
            .field("locks", &self.locks)
            .finish_non_exhaustive()
    }
}

/// Writes the full record sequence to `temp`, then renames it over
/// `path` in one filesystem operation.
async fn persist(path: &Path, temp: &Path, records: &[PaymentRecord]) -> Result<(), LedgerError> {
    let content = codec::encode_partition(records)?;
    tokio::fs::write(temp, content)
        .await
        .map_err(|source| LedgerError::io(temp, source))?;
    tokio::fs::rename(temp, path)
        .await
        .map_err(|source| LedgerError::io(path, source))?;
    Ok(())
}

/// Removes a leftover temp file, logging (not failing) if removal itself
/// fails; the original write error is what propagates to the caller.
async fn remove_temp_best_effort(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::error!(temp = %temp.display(), error = %err, "failed to clean up temp file");
        }
    }
}
