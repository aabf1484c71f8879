//! Operator inspection tool for the payment ledger.
//!
//! Reads the ledger configuration from the environment and prints records
//! as JSON lines: the latest payment in today's partition by default, or
//! a tenant's records over the trailing query window when `TENANT_ID` is
//! set.

use payment_ledger::config::LedgerConfig;
use payment_ledger::service::PaymentLedger;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = LedgerConfig::from_env();
    tracing::info!(base_dir = %config.base_dir.display(), "inspecting payment ledger");

    let ledger = PaymentLedger::new(config);
    tracing::info!(
        partition = %ledger.partition_path_for(None).display(),
        "today's partition"
    );

    match std::env::var("TENANT_ID") {
        Ok(tenant_id) => {
            let records = ledger.read_payments_by_tenant(&tenant_id, None, None).await?;
            tracing::info!(tenant_id, count = records.len(), "tenant records in window");
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Err(_) => match ledger.latest_payment().await? {
            Some(record) => println!("{}", serde_json::to_string(&record)?),
            None => tracing::info!("no payments recorded today"),
        },
    }

    Ok(())
}
