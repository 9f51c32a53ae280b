//! Runtime configuration, read from the environment (after `.env`, when the
//! binary loads one).

pub mod ai;

use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub use ai::AiConfig;

pub const ENV_HTML_PATH: &str = "HTML_PATH";
pub const ENV_WORKER_URL: &str = "WORKER_URL";
pub const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL";
pub const ENV_DELIVERY_TIMEOUT: &str = "DELIVERY_TIMEOUT_SECS";

pub const DEFAULT_HTML_PATH: &str = "/app/trend_output/html/latest/daily.html";
pub const DEFAULT_WORKER_URL: &str = "http://hacker-podcast:8787/api/cron";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Report file the upstream generator rewrites.
    pub report_path: PathBuf,
    /// Webhook receiving `{ today, custom_script }`.
    pub webhook_url: String,
    pub poll_interval: Duration,
    pub delivery_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            report_path: PathBuf::from(DEFAULT_HTML_PATH),
            webhook_url: DEFAULT_WORKER_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            delivery_timeout: Duration::from_secs(DEFAULT_DELIVERY_TIMEOUT_SECS),
        }
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            report_path: env::var(ENV_HTML_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.report_path),
            webhook_url: env::var(ENV_WORKER_URL).unwrap_or(defaults.webhook_url),
            poll_interval: secs_var(ENV_POLL_INTERVAL, DEFAULT_POLL_INTERVAL_SECS),
            delivery_timeout: secs_var(ENV_DELIVERY_TIMEOUT, DEFAULT_DELIVERY_TIMEOUT_SECS),
        }
    }
}

/// Positive whole seconds; anything else falls back to `default` with a warning.
fn secs_var(key: &str, default: u64) -> Duration {
    let secs = match env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => v,
            _ => {
                tracing::warn!(var = key, value = %raw, default, "invalid seconds value, using default");
                default
            }
        },
        Err(_) => default,
    };
    Duration::from_secs(secs)
}
