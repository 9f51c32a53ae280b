//! Error taxonomy for the bridge.
//!
//! Only `Config` is fatal. Everything else is caught at the poll-cycle
//! boundary, logged, and leaves the delivery marker untouched so the report
//! is retried on the next poll.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The report parsed but holds neither news nor analysis.
    #[error("report {} has no usable content", .path.display())]
    ExtractionInvalid { path: PathBuf },

    /// The script generator call failed.
    #[error("script generation failed: {0}")]
    Generation(String),

    /// The script generator answered with nothing.
    #[error("generated script is empty")]
    EmptyScript,

    /// The webhook answered with a non-2xx status.
    #[error("delivery endpoint returned {status}: {body}")]
    DeliveryStatus { status: u16, body: String },

    /// Network-level failure (connect, timeout, decode).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The webhook accepted the script but the marker could not be written;
    /// the same report version will be delivered again on the next poll.
    #[error("report {} delivered but marker not written: {source}", .path.display())]
    MarkerNotRecorded {
        path: PathBuf,
        #[source]
        source: Box<BridgeError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Short stage label used for logs and metrics.
    pub fn stage(&self) -> &'static str {
        match self {
            BridgeError::Config(_) => "config",
            BridgeError::ExtractionInvalid { .. } => "extract",
            BridgeError::Generation(_) | BridgeError::EmptyScript => "generate",
            BridgeError::DeliveryStatus { .. } | BridgeError::Transport(_) => "deliver",
            BridgeError::MarkerNotRecorded { .. } => "marker",
            BridgeError::Io(_) => "io",
        }
    }
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;
