use std::path::PathBuf;
use std::time::Duration;

use investfolio_core::constants::{DEFAULT_ACTION_TIMEOUT_MS, DEFAULT_MERGE_WINDOW_HOURS};
use investfolio_core::settings::SettlementSettings;

const DEFAULT_PRICE_REFRESH_INTERVAL_SECS: u64 = 900;

pub struct Config {
    pub db_path: String,
    pub merge_window_hours: i64,
    pub action_timeout: Duration,
    pub price_refresh_interval: Duration,
    pub prices_file: Option<PathBuf>,
    /// `FROM/TO=RATE` entries seeded into the FX table at startup.
    pub fx_rates: Vec<String>,
    pub log_format: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            eprintln!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let db_path =
            std::env::var("IF_DB_PATH").unwrap_or_else(|_| "./db/investfolio.db".into());
        let merge_window_hours = env_or("IF_MERGE_WINDOW_HOURS", DEFAULT_MERGE_WINDOW_HOURS);
        let timeout_ms: u64 = env_or("IF_ACTION_TIMEOUT_MS", DEFAULT_ACTION_TIMEOUT_MS);
        let refresh_secs: u64 = env_or(
            "IF_PRICE_REFRESH_INTERVAL_SECS",
            DEFAULT_PRICE_REFRESH_INTERVAL_SECS,
        );
        let prices_file = std::env::var("IF_PRICES_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);
        let fx_rates = std::env::var("IF_FX_RATES")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();
        let log_format = std::env::var("IF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Self {
            db_path,
            merge_window_hours,
            action_timeout: Duration::from_millis(timeout_ms),
            price_refresh_interval: Duration::from_secs(refresh_secs.max(1)),
            prices_file,
            fx_rates,
            log_format,
        }
    }

    pub fn settlement_settings(&self) -> SettlementSettings {
        SettlementSettings::default()
            .with_merge_window(chrono::Duration::hours(self.merge_window_hours.max(0)))
            .with_action_timeout(self.action_timeout)
    }
}
