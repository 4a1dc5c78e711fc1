use chrono::Utc;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

use super::types::StoredStats;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stats file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stats writer is no longer running")]
    WriterClosed,
}

/// The stats document on disk.
///
/// Each method performs a full read-modify-write with no locking of its
/// own; callers are expected to serialize access (see [`super::StatsHandle`]).
#[derive(Debug, Clone)]
pub struct StatsStore {
    path: PathBuf,
}

impl StatsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the document with zeroed counters if it does not exist yet.
    pub async fn ensure_initialized(&self) -> Result<(), StatsError> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        self.write(&StoredStats::new(Utc::now())).await?;
        info!("Initialized stats file at {}", self.path.display());
        Ok(())
    }

    /// Read the document, re-initializing and retrying once on failure.
    ///
    /// An unparsable document is moved to `<file>.corrupt` before the retry.
    pub async fn read(&self) -> Result<StoredStats, StatsError> {
        match self.read_once().await {
            Ok(stats) => Ok(stats),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Stats file unreadable, re-initializing"
                );
                if matches!(e, StatsError::Json(_)) {
                    let aside = sibling(&self.path, ".corrupt");
                    fs::rename(&self.path, &aside).await?;
                    warn!("Moved corrupt stats file to {}", aside.display());
                }
                self.ensure_initialized().await?;
                self.read_once().await
            }
        }
    }

    async fn read_once(&self) -> Result<StoredStats, StatsError> {
        let data = fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Replace the document atomically (temp file + rename).
    pub async fn write(&self, stats: &StoredStats) -> Result<(), StatsError> {
        let body = serde_json::to_string_pretty(stats)?;
        let tmp = sibling(&self.path, ".tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub async fn record_success(
        &self,
        response_time_ms: f64,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<StoredStats, StatsError> {
        let mut stats = self.read().await?;
        stats.record_success(response_time_ms, source_lang, target_lang, Utc::now());
        self.write(&stats).await?;
        debug!(
            total = stats.total_requests,
            source = source_lang,
            target = target_lang,
            "Recorded successful translation"
        );
        Ok(stats)
    }

    pub async fn record_failure(&self) -> Result<StoredStats, StatsError> {
        let mut stats = self.read().await?;
        stats.record_failure(Utc::now());
        self.write(&stats).await?;
        debug!(total = stats.total_requests, "Recorded failed translation");
        Ok(stats)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("stats"));
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> StatsStore {
        StatsStore::new(dir.path().join("stats.json"))
    }

    #[tokio::test]
    async fn initializes_missing_file_with_zeroes() {
        let dir = TempDir::new().unwrap();
        let store = StatsStore::new(dir.path().join("nested/dir/stats.json"));

        store.ensure_initialized().await.unwrap();

        let stats = store.read().await.unwrap();
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.total_response_time, 0.0);
        assert!(stats.source_languages.is_empty());
        assert!(stats.target_languages.is_empty());
    }

    #[tokio::test]
    async fn ensure_initialized_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.ensure_initialized().await.unwrap();
        store.record_success(5.0, "en", "pt").await.unwrap();
        let before = store.read().await.unwrap();

        store.ensure_initialized().await.unwrap();
        store.ensure_initialized().await.unwrap();
        assert_eq!(store.read().await.unwrap(), before);
    }

    #[tokio::test]
    async fn record_success_increments_by_one() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.ensure_initialized().await.unwrap();

        let before = store.read().await.unwrap();
        store.record_success(42.0, "es", "en").await.unwrap();
        let after = store.read().await.unwrap();

        assert_eq!(after.total_requests, before.total_requests + 1);
        assert_eq!(after.successful_translations, before.successful_translations + 1);
        assert_eq!(after.failed_translations, before.failed_translations);
        assert_eq!(after.source_languages.get("es"), Some(&1));
        assert_eq!(after.target_languages.get("en"), Some(&1));
        assert!(after.is_consistent());
    }

    #[tokio::test]
    async fn record_failure_only_touches_failure_counters() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let stats = store.record_failure().await.unwrap();
        assert_eq!(stats.total_requests, 1);
        assert_eq!(stats.failed_translations, 1);
        assert_eq!(stats.successful_translations, 0);
        assert_eq!(stats.total_response_time, 0.0);
    }

    #[tokio::test]
    async fn corrupt_file_is_set_aside_and_reset() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(store.path(), "{ not json").unwrap();

        let stats = store.read().await.unwrap();
        assert_eq!(stats.total_requests, 0);

        let aside = dir.path().join("stats.json.corrupt");
        assert_eq!(std::fs::read_to_string(aside).unwrap(), "{ not json");
    }

    #[tokio::test]
    async fn reads_documents_written_by_other_tools() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::write(
            store.path(),
            r#"{
  "totalRequests": 3,
  "successfulTranslations": 2,
  "failedTranslations": 1,
  "totalResponseTime": 250.5,
  "sourceLanguages": { "en": 2 },
  "targetLanguages": { "pt": 2 },
  "lastUpdated": "2024-05-01T12:00:00.000Z"
}"#,
        )
        .unwrap();

        let stats = store.record_success(49.5, "en", "pt").await.unwrap();
        assert_eq!(stats.total_requests, 4);
        assert_eq!(stats.total_response_time, 300.0);
        assert_eq!(stats.source_languages["en"], 3);
    }

    #[tokio::test]
    async fn no_temp_file_is_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.record_failure().await.unwrap();

        assert!(!dir.path().join("stats.json.tmp").exists());
    }
}
