//! Delivery markers: the only state that survives between poll cycles.
//!
//! A marker records, per report path, the version (modification time) of the
//! last report that was successfully delivered. A report is fresh iff it was
//! modified strictly after that point, or no marker exists yet.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;

use crate::error::Result;

const MARKER_SUFFIX: &str = ".processed";

/// Freshness test shared by every store.
pub fn is_fresh(report_modified: SystemTime, last_delivered: Option<SystemTime>) -> bool {
    match last_delivered {
        None => true,
        Some(marker) => report_modified > marker,
    }
}

#[async_trait]
pub trait MarkerStore: Send + Sync {
    /// Baseline of the last successful delivery for `report`, if any.
    async fn last_delivered(&self, report: &Path) -> Result<Option<SystemTime>>;

    /// Record a successful delivery of `report`; returns the new baseline.
    async fn record_delivery(&self, report: &Path) -> Result<SystemTime>;
}

/// Marker file next to the report (`<report>.processed`). The file's own
/// mtime is the baseline; its body holds the delivery unix timestamp for
/// humans.
#[derive(Debug, Clone, Default)]
pub struct FileMarkerStore;

impl FileMarkerStore {
    pub fn marker_path(report: &Path) -> PathBuf {
        let mut name = report.as_os_str().to_os_string();
        name.push(MARKER_SUFFIX);
        PathBuf::from(name)
    }
}

#[async_trait]
impl MarkerStore for FileMarkerStore {
    async fn last_delivered(&self, report: &Path) -> Result<Option<SystemTime>> {
        match fs::metadata(Self::marker_path(report)).await {
            Ok(meta) => Ok(Some(meta.modified()?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn record_delivery(&self, report: &Path) -> Result<SystemTime> {
        let path = Self::marker_path(report);
        fs::write(&path, Utc::now().timestamp().to_string()).await?;
        Ok(fs::metadata(&path).await?.modified()?)
    }
}

/// In-process marker map; used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryMarkerStore {
    delivered: Mutex<HashMap<PathBuf, SystemTime>>,
}

impl MemoryMarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a baseline, e.g. to simulate an earlier delivery.
    pub fn set(&self, report: impl Into<PathBuf>, at: SystemTime) {
        self.delivered
            .lock()
            .expect("marker map poisoned")
            .insert(report.into(), at);
    }

    pub fn get(&self, report: &Path) -> Option<SystemTime> {
        self.delivered
            .lock()
            .expect("marker map poisoned")
            .get(report)
            .copied()
    }
}

#[async_trait]
impl MarkerStore for MemoryMarkerStore {
    async fn last_delivered(&self, report: &Path) -> Result<Option<SystemTime>> {
        Ok(self.get(report))
    }

    async fn record_delivery(&self, report: &Path) -> Result<SystemTime> {
        let now = SystemTime::now();
        self.set(report, now);
        Ok(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn freshness_rules() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert!(is_fresh(t, None));
        assert!(!is_fresh(t, Some(t + Duration::from_secs(5))));
        assert!(!is_fresh(t, Some(t)));
        assert!(is_fresh(t + Duration::from_secs(5), Some(t)));
    }

    #[test]
    fn marker_path_appends_suffix() {
        let p = FileMarkerStore::marker_path(Path::new("/data/html/daily.html"));
        assert_eq!(p, PathBuf::from("/data/html/daily.html.processed"));
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("daily.html");
        std::fs::write(&report, "<html></html>").unwrap();

        let store = FileMarkerStore;
        assert_eq!(store.last_delivered(&report).await.unwrap(), None);

        let at = store.record_delivery(&report).await.unwrap();
        assert_eq!(store.last_delivered(&report).await.unwrap(), Some(at));
        let body = std::fs::read_to_string(FileMarkerStore::marker_path(&report)).unwrap();
        assert!(body.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn memory_store_keys_by_path() {
        let store = MemoryMarkerStore::new();
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(10);
        store.set("/a.html", t);
        assert_eq!(store.last_delivered(Path::new("/a.html")).await.unwrap(), Some(t));
        assert_eq!(store.last_delivered(Path::new("/b.html")).await.unwrap(), None);
    }
}
