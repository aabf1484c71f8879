//! Ledger configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`), with defaults suitable for local
//! development.

use std::path::PathBuf;

/// Top-level ledger configuration.
///
/// Loaded once at startup via [`LedgerConfig::from_env`] and handed to
/// [`PaymentLedger::new`](crate::service::PaymentLedger::new). Tests build
/// it directly with [`LedgerConfig::new`] pointed at a scratch directory.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Base directory holding the day-partitioned payment files
    /// (`payments-YYYY-MM-DD.json`). Created on first write.
    pub base_dir: PathBuf,

    /// Trailing window, in days, for tenant queries that do not pass an
    /// explicit date range.
    pub tenant_window_days: u32,
}

/// Default base directory when `PAYMENTS_JSON_PATH` is unset.
const DEFAULT_BASE_DIR: &str = "./data/payments";

/// Default trailing window for tenant queries.
const DEFAULT_TENANT_WINDOW_DAYS: u32 = 30;

impl LedgerConfig {
    /// Creates a configuration with the given base directory and the
    /// default tenant query window.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            tenant_window_days: DEFAULT_TENANT_WINDOW_DAYS,
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set or does not
    /// parse. Calls `dotenvy::dotenv().ok()` to optionally load a `.env`
    /// file.
    ///
    /// | Variable                     | Default           |
    /// |------------------------------|-------------------|
    /// | `PAYMENTS_JSON_PATH`         | `./data/payments` |
    /// | `PAYMENTS_TENANT_WINDOW_DAYS`| `30`              |
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let base_dir = std::env::var("PAYMENTS_JSON_PATH")
            .unwrap_or_else(|_| DEFAULT_BASE_DIR.to_string())
            .into();
        let tenant_window_days =
            parse_env("PAYMENTS_TENANT_WINDOW_DAYS", DEFAULT_TENANT_WINDOW_DAYS);

        Self {
            base_dir,
            tenant_window_days,
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
