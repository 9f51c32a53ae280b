//! Poll cycle: report file → extraction → script generation → webhook.
//!
//! Each cycle is one pass through
//! `CHECKING → EXTRACTING → GENERATING → DELIVERING`, stopping early when the
//! report is missing or already delivered. The marker is written only after
//! the webhook confirmed, so any failure leaves the report eligible for the
//! next poll.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use metrics::{counter, describe_counter, describe_gauge, gauge};
use once_cell::sync::OnceCell;
use tokio::{fs, time};
use tracing::{error, info, warn};

use crate::deliver::{DeliveryPayload, DynDelivery};
use crate::error::{BridgeError, Result};
use crate::extract::ReportExtractor;
use crate::generate::DynGenerator;
use crate::marker::{is_fresh, MarkerStore};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("bridge_cycles_total", "Poll cycles started.");
        describe_counter!("bridge_deliveries_total", "Reports delivered to the webhook.");
        describe_counter!(
            "bridge_failures_total",
            "Cycles that failed, labeled by stage."
        );
        describe_gauge!(
            "bridge_last_delivery_ts",
            "Unix ts of the last confirmed delivery."
        );
    });
}

/// How a cycle ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No report file yet.
    ReportMissing,
    /// The current report version was delivered before.
    AlreadyDelivered,
    /// A script was generated and accepted by the webhook.
    Delivered { date: String, script_chars: usize },
}

impl CycleOutcome {
    pub fn delivered(&self) -> bool {
        matches!(self, CycleOutcome::Delivered { .. })
    }
}

pub struct Bridge {
    report_path: PathBuf,
    generator: DynGenerator,
    delivery: DynDelivery,
    markers: Arc<dyn MarkerStore>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Bridge {
    pub fn new(
        report_path: impl Into<PathBuf>,
        generator: DynGenerator,
        delivery: DynDelivery,
        markers: Arc<dyn MarkerStore>,
    ) -> Self {
        Self {
            report_path: report_path.into(),
            generator,
            delivery,
            markers,
            today: local_today,
        }
    }

    /// Override the date stamped on payloads.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Run one cycle. Errors mean the report stays eligible for a retry.
    pub async fn run_cycle(&self) -> Result<CycleOutcome> {
        ensure_metrics_described();
        counter!("bridge_cycles_total").increment(1);

        let path = self.report_path.as_path();
        info!(path = %path.display(), "checking for report");

        let modified = match fs::metadata(path).await {
            Ok(meta) => meta.modified()?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("report file not found yet");
                return Ok(CycleOutcome::ReportMissing);
            }
            Err(e) => return Err(e.into()),
        };

        let last = self.markers.last_delivered(path).await?;
        if !is_fresh(modified, last) {
            info!("report already delivered, skipping");
            return Ok(CycleOutcome::AlreadyDelivered);
        }
        info!("new report found, processing");

        let html = fs::read_to_string(path).await?;
        let report = ReportExtractor::from_html(&html).extract();
        if !report.is_valid() {
            return Err(BridgeError::ExtractionInvalid {
                path: path.to_path_buf(),
            });
        }
        info!(
            news = report.news_items.len(),
            analysis_chars = report.analysis_text.chars().count(),
            "report extracted"
        );

        let script = self.generator.generate(&report).await?;
        if script.trim().is_empty() {
            return Err(BridgeError::EmptyScript);
        }
        let script_chars = script.chars().count();
        info!(generator = self.generator.name(), script_chars, "script generated");

        let payload = DeliveryPayload::new((self.today)(), script);
        self.delivery.deliver(&payload).await?;

        counter!("bridge_deliveries_total").increment(1);
        gauge!("bridge_last_delivery_ts").set(Utc::now().timestamp() as f64);
        info!(date = %payload.date, "report delivered");

        self.markers
            .record_delivery(path)
            .await
            .map_err(|e| BridgeError::MarkerNotRecorded {
                path: path.to_path_buf(),
                source: Box::new(e),
            })?;

        Ok(CycleOutcome::Delivered {
            date: payload.date,
            script_chars,
        })
    }

    /// Run one cycle and swallow its failure. Returns whether a delivery
    /// happened.
    pub async fn process_once(&self) -> bool {
        match self.run_cycle().await {
            Ok(outcome) => outcome.delivered(),
            Err(e) => {
                record_failure(&e);
                false
            }
        }
    }

    /// Poll forever with a fixed pause between cycles.
    pub async fn run_loop(&self, interval: Duration) {
        info!(
            path = %self.report_path.display(),
            interval_secs = interval.as_secs(),
            "starting bridge polling loop"
        );
        loop {
            self.process_once().await;
            time::sleep(interval).await;
        }
    }
}

/// Log and count a failed cycle.
pub fn record_failure(e: &BridgeError) {
    counter!("bridge_failures_total", "stage" => e.stage()).increment(1);
    match e {
        BridgeError::ExtractionInvalid { .. } => warn!(error = %e, "extracted content is empty or invalid"),
        BridgeError::MarkerNotRecorded { .. } => error!(
            stage = e.stage(),
            error = %e,
            "delivered but marker not written; report will be delivered again"
        ),
        _ => error!(stage = e.stage(), error = %e, "cycle failed; will retry on next poll"),
    }
}
