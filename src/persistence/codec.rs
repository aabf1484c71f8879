//! Newline-delimited JSON codec for partition files.
//!
//! Each line of a partition file is one complete [`PaymentRecord`] in
//! append order. A missing file reads as an empty partition; a malformed
//! line fails the whole read — there is no partial-read recovery, because
//! the atomic-write discipline means a corrupt partition signals an
//! upstream bug.

use std::path::Path;

use crate::domain::PaymentRecord;
use crate::error::LedgerError;

/// Reads all records currently persisted in a partition file, in append
/// order.
///
/// Blank lines are skipped. A file that does not exist reads as an empty
/// partition.
///
/// # Errors
///
/// Returns [`LedgerError::Io`] for any I/O failure other than
/// file-not-found, and [`LedgerError::MalformedRecord`] (with the 1-based
/// line number) if any line fails to parse.
pub async fn read_partition(path: &Path) -> Result<Vec<PaymentRecord>, LedgerError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(LedgerError::io(path, err)),
    };
    decode(path, &content)
}

/// Serializes records to the newline-delimited partition format, one JSON
/// object per line with a trailing newline.
///
/// # Errors
///
/// Returns [`LedgerError::Serialize`] if a record cannot be encoded.
pub fn encode_partition(records: &[PaymentRecord]) -> Result<String, LedgerError> {
    let mut content = String::new();
    for record in records {
        let line = serde_json::to_string(record).map_err(LedgerError::Serialize)?;
        content.push_str(&line);
        content.push('\n');
    }
    Ok(content)
}

fn decode(path: &Path, content: &str) -> Result<Vec<PaymentRecord>, LedgerError> {
    let mut records = Vec::new();
    for (index, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record =
            serde_json::from_str(line).map_err(|source| LedgerError::MalformedRecord {
                path: path.to_path_buf(),
                line: index.saturating_add(1),
                source,
            })?;
        records.push(record);
    }
    Ok(records)
}
