//! In-process mutual exclusion keyed by partition path.
//!
//! [`PathMutex`] serializes read-modify-write cycles touching the same
//! partition file within one process. Distinct paths never contend; every
//! `acquire` on an already-held path suspends the caller (without
//! occupying a thread) until the holder's guard is dropped.
//!
//! This is **not** a cross-process lock: two server instances writing the
//! same partition still rely on atomic renames to avoid corruption, and
//! their idempotency checks can race. The production safety net for that
//! deployment shape is the primary database's unique constraint.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Table of per-path async mutexes.
///
/// Owned by a single [`PaymentLedger`](crate::service::PaymentLedger)
/// instance and shared by reference — never a module-level singleton, so
/// tests can run independent ledgers with isolated lock tables.
///
/// # Reclamation
///
/// The table holds [`Weak`] references: once no holder or waiter remains
/// for a path, its mutex is freed, and the dead entry is pruned on a
/// subsequent `acquire`. The table never grows without bound under normal
/// operation.
#[derive(Debug, Default)]
pub struct PathMutex {
    locks: StdMutex<HashMap<PathBuf, Weak<AsyncMutex<()>>>>,
}

/// Release handle returned by [`PathMutex::acquire`].
///
/// Dropping the guard releases the path — release-on-exit is structural,
/// so an abandoned operation can never deadlock subsequent writers.
#[derive(Debug)]
pub struct PathGuard {
    _permit: OwnedMutexGuard<()>,
}

impl PathMutex {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the mutex for `key`, suspending until any current holder
    /// releases. Acquisitions on different keys proceed concurrently.
    ///
    /// There is no deadline: a holder stuck on a hung filesystem blocks
    /// all subsequent writers to that path indefinitely (accepted for the
    /// low-volume, single-instance deployment target).
    pub async fn acquire(&self, key: &Path) -> PathGuard {
        let cell = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, weak| weak.strong_count() > 0);
            match locks.get(key).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let fresh = Arc::new(AsyncMutex::new(()));
                    locks.insert(key.to_path_buf(), Arc::downgrade(&fresh));
                    fresh
                }
            }
        };
        PathGuard {
            _permit: cell.lock_owned().await,
        }
    }

    /// Returns the number of live entries in the lock table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Returns `true` if no path currently has a holder or waiter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
