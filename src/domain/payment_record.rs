//! Payment record model persisted to the day-partitioned ledger files.
//!
//! Field names serialize in camelCase (`providerPaymentId`, `tenantId`, …)
//! because the partition files are shared with the panel backend that
//! originally produced them; the on-disk format is part of the contract.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One payment webhook event, one line in a partition file.
///
/// Constructed by the webhook handler after the event is confirmed
/// processed; the ledger never mutates a record once appended. `amount`
/// is stored exactly as provided — the caller converts from provider
/// minor units (cents) to major units (dollars) before the write, and the
/// ledger performs no currency math.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Opaque identifier assigned by the caller (typically the primary
    /// database record id). Unique by convention only.
    pub id: String,

    /// Owning tenant.
    pub tenant_id: String,

    /// Monetary amount in major units, currency-agnostic.
    pub amount: f64,

    /// ISO-4217-style 3-letter currency code, uppercase by convention.
    pub currency: String,

    /// Outcome of the payment event. Free-form, but producers only emit
    /// `"succeeded"` and `"failed"`.
    pub status: String,

    /// The payment gateway's own identifier for the event. This is the
    /// idempotency key: at most one record per value per partition.
    pub provider_payment_id: String,

    /// Optional human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional open map of auxiliary data (event type, source references,
    /// processing timestamps).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,

    /// Creation timestamp, set by the caller before the write.
    pub created_at: DateTime<Utc>,

    /// Last-update timestamp, set by the caller before the write.
    pub updated_at: DateTime<Utc>,
}

/// A [`PaymentRecord`] decorated with its on-disk location.
///
/// Returned by [`write_atomic`](crate::service::PaymentLedger::write_atomic)
/// for both freshly persisted records and idempotency hits (in which case
/// it points at the pre-existing line).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPaymentRecord {
    /// The stored record.
    #[serde(flatten)]
    pub record: PaymentRecord,

    /// Partition file holding the record.
    pub filepath: PathBuf,

    /// Zero-based line index of the record within its partition.
    pub line_offset: usize,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_record() -> PaymentRecord {
        let Some(created_at) = DateTime::parse_from_rfc3339("2024-11-10T10:00:00Z")
            .ok()
            .map(|t| t.with_timezone(&Utc))
        else {
            panic!("valid timestamp");
        };
        PaymentRecord {
            id: "b1".to_string(),
            tenant_id: "t1".to_string(),
            amount: 100.0,
            currency: "USD".to_string(),
            status: "succeeded".to_string(),
            provider_payment_id: "pi_001".to_string(),
            description: None,
            metadata: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn serializes_in_camel_case() {
        let record = make_record();
        let Ok(json) = serde_json::to_string(&record) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"providerPaymentId\":\"pi_001\""));
        assert!(json.contains("\"tenantId\":\"t1\""));
        assert!(json.contains("\"createdAt\":\"2024-11-10T10:00:00Z\""));
    }

    #[test]
    fn absent_optionals_are_omitted() {
        let record = make_record();
        let Ok(json) = serde_json::to_string(&record) else {
            panic!("serialization failed");
        };
        assert!(!json.contains("description"));
        assert!(!json.contains("metadata"));
    }

    #[test]
    fn metadata_round_trips_unchanged() {
        let mut record = make_record();
        let mut metadata = serde_json::Map::new();
        metadata.insert("eventType".to_string(), "payment_intent.succeeded".into());
        metadata.insert("testMode".to_string(), true.into());
        record.metadata = Some(metadata);

        let Ok(json) = serde_json::to_string(&record) else {
            panic!("serialization failed");
        };
        let Ok(back) = serde_json::from_str::<PaymentRecord>(&json) else {
            panic!("deserialization failed");
        };
        assert_eq!(back, record);
    }

    #[test]
    fn stored_record_flattens_the_inner_record() {
        let stored = StoredPaymentRecord {
            record: make_record(),
            filepath: PathBuf::from("/data/payments/payments-2024-11-10.json"),
            line_offset: 0,
        };
        let Ok(json) = serde_json::to_value(&stored) else {
            panic!("serialization failed");
        };
        // Flattened: record fields live at the top level next to the
        // location fields, matching the shape the panel backend returns.
        assert_eq!(json.get("providerPaymentId").and_then(|v| v.as_str()), Some("pi_001"));
        assert_eq!(json.get("lineOffset").and_then(|v| v.as_u64()), Some(0));
        assert!(json.get("record").is_none());
    }
}
