//! Partition path resolution.
//!
//! The ledger keeps one file per UTC calendar day,
//! `<base-dir>/payments-YYYY-MM-DD.json`. Resolution is pure: the caller
//! supplies the instant and the base directory; nothing here touches the
//! filesystem.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// File-name prefix for every partition.
const PARTITION_PREFIX: &str = "payments-";

/// Partition file extension.
const PARTITION_EXT: &str = "json";

/// Returns the partition file name for the given UTC calendar day,
/// e.g. `payments-2024-11-10.json`.
#[must_use]
pub fn partition_file_name(day: NaiveDate) -> String {
    format!("{PARTITION_PREFIX}{}.{PARTITION_EXT}", day.format("%Y-%m-%d"))
}

/// Returns the full partition path for the given UTC calendar day under
/// `base_dir`.
///
/// A record whose logical event time crosses a day boundary after
/// processing started is still placed by "now" at write time — callers
/// must not assume exact event-time partitioning.
#[must_use]
pub fn partition_path(base_dir: &Path, day: NaiveDate) -> PathBuf {
    base_dir.join(partition_file_name(day))
}

/// Returns a temporary sibling path for the given partition, carrying a
/// per-attempt unique `.{uuid}.tmp` suffix.
///
/// The temp file lives in the same directory as the partition so the
/// final rename stays within one filesystem. It must never be visible as
/// a stable end-state: the writer either renames it over the partition or
/// removes it on failure.
#[must_use]
pub fn temp_path(partition: &Path) -> PathBuf {
    let file_name = partition
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    partition.with_file_name(format!(
        "{file_name}.{}.tmp",
        uuid::Uuid::new_v4().simple()
    ))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(day) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        day
    }

    #[test]
    fn file_name_uses_iso_date() {
        assert_eq!(
            partition_file_name(day(2024, 11, 10)),
            "payments-2024-11-10.json"
        );
    }

    #[test]
    fn single_digit_components_are_zero_padded() {
        assert_eq!(
            partition_file_name(day(2025, 1, 3)),
            "payments-2025-01-03.json"
        );
    }

    #[test]
    fn path_joins_base_dir() {
        let path = partition_path(Path::new("/var/lib/ledger"), day(2024, 11, 10));
        assert_eq!(
            path,
            PathBuf::from("/var/lib/ledger/payments-2024-11-10.json")
        );
    }

    #[test]
    fn different_days_resolve_to_different_files() {
        let base = Path::new("/data");
        assert_ne!(
            partition_path(base, day(2024, 11, 10)),
            partition_path(base, day(2024, 11, 11))
        );
    }

    #[test]
    fn temp_path_is_adjacent_and_suffixed() {
        let partition = PathBuf::from("/data/payments-2024-11-10.json");
        let temp = temp_path(&partition);
        assert_eq!(temp.parent(), partition.parent());
        let name = temp.file_name().map(|n| n.to_string_lossy().into_owned());
        let Some(name) = name else {
            panic!("temp path has a file name");
        };
        assert!(name.starts_with("payments-2024-11-10.json."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn temp_paths_are_unique_per_attempt() {
        let partition = PathBuf::from("/data/payments-2024-11-10.json");
        assert_ne!(temp_path(&partition), temp_path(&partition));
    }
}
