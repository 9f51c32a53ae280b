// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod analysis;
pub mod bridge;
pub mod config;
pub mod deliver;
pub mod error;
pub mod extract;
pub mod generate;
pub mod marker;
pub mod normalize;
pub mod render;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::analysis::{AnalysisResult, KnownSection, Section};
pub use crate::bridge::{Bridge, CycleOutcome};
pub use crate::config::{AiConfig, BridgeConfig};
pub use crate::deliver::{Delivery, DeliveryPayload, WebhookDelivery};
pub use crate::error::BridgeError;
pub use crate::extract::{ExtractedReport, NewsItem, ReportExtractor};
pub use crate::generate::{OpenAiScriptGenerator, ScriptGenerator};
pub use crate::marker::{FileMarkerStore, MarkerStore, MemoryMarkerStore};
pub use crate::normalize::normalize;

use std::sync::Arc;

/// Wire the production bridge from environment configuration.
/// Fails fast when the generator credential is missing.
pub fn bridge_from_env(cfg: &BridgeConfig) -> Result<Bridge, BridgeError> {
    let generator = OpenAiScriptGenerator::from_env()?;
    let delivery = WebhookDelivery::new(cfg.webhook_url.clone()).with_timeout(cfg.delivery_timeout);
    Ok(Bridge::new(
        cfg.report_path.clone(),
        Arc::new(generator),
        Arc::new(delivery),
        Arc::new(FileMarkerStore),
    ))
}
