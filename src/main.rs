//! Report bridge: watches the daily HTML report and hands each new version to
//! the podcast worker.
//!
//! `report-bridge once` runs a single cycle; without arguments it polls
//! forever on `POLL_INTERVAL`.

use std::process::ExitCode;

use report_bridge::bridge::record_failure;
use report_bridge::{bridge_from_env, telemetry, BridgeConfig};
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();
    telemetry::init_metrics();

    let cfg = BridgeConfig::from_env();
    let bridge = match bridge_from_env(&cfg) {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "cannot start bridge");
            return ExitCode::from(2);
        }
    };

    let once = std::env::args().nth(1).is_some_and(|a| a == "once");
    if once {
        return match bridge.run_cycle().await {
            Ok(outcome) => {
                info!(?outcome, "single run finished");
                ExitCode::SUCCESS
            }
            Err(e) => {
                record_failure(&e);
                ExitCode::FAILURE
            }
        };
    }

    info!(target_url = %cfg.webhook_url, "delivery target");
    bridge.run_loop(cfg.poll_interval).await;
    ExitCode::SUCCESS
}
