//! Logging and metrics setup for the binaries.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";
pub const ENV_METRICS_ADDR: &str = "METRICS_ADDR";

/// Install the global subscriber. `RUST_LOG` filters (default `info`),
/// `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

/// Expose Prometheus metrics on `METRICS_ADDR` when set. Must run inside a
/// tokio runtime. Failures are logged, never fatal.
pub fn init_metrics() {
    let Ok(raw) = std::env::var(ENV_METRICS_ADDR) else {
        return;
    };
    let addr: SocketAddr = match raw.trim().parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "invalid METRICS_ADDR, metrics disabled");
            return;
        }
    };
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(%addr, "prometheus exporter listening"),
        Err(e) => tracing::warn!(error = %e, "prometheus exporter not installed"),
    }
}
