//! Durable JSON-file pending-lead store
//!
//! The whole set lives in one JSON document. Writes go to a uniquely named
//! temp file in the same directory that is then renamed over the original,
//! so readers never observe a half-written document.
//!
//! Every operation holds an advisory lock on `<file>.lock`: shared for
//! reads, exclusive for load-modify-write cycles. The service and the CLI
//! maintenance commands can therefore work on the same file at once.

use super::{PendingLeadStore, PendingSet, StoreError, StoredLead};
use crate::lead::{LeadId, LeadRecord};
use async_trait::async_trait;
use chrono::Utc;
use fs4::fs_std::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Shared,
    Exclusive,
}

/// File-backed store; the document is re-read under the file lock on every
/// operation
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Create a store at `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".lock");
        self.path.with_file_name(name)
    }

    /// Open the lock file and block (off the runtime) until the lock is held;
    /// dropping the returned file releases it
    async fn lock_file(&self, mode: LockMode) -> Result<File, StoreError> {
        let path = self.lock_path();
        let file = tokio::task::spawn_blocking(move || -> std::io::Result<File> {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&path)?;
            match mode {
                LockMode::Shared => FileExt::lock_shared(&file)?,
                LockMode::Exclusive => FileExt::lock_exclusive(&file)?,
            }
            Ok(file)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("lock task failed: {}", e)))??;
        Ok(file)
    }

    async fn load(&self) -> Result<PendingSet, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(PendingSet::default()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PendingSet::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Must be called with the exclusive lock held
    async fn persist(&self, set: &PendingSet) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(set)?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let mut tmp = NamedTempFile::new_in(dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path)?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("write task failed: {}", e)))??;

        tracing::debug!(path = ?self.path, entries = set.entries.len(), "Pending leads persisted");
        Ok(())
    }

    /// Load, apply `f`, and write back when `f` reports a change
    async fn update<T>(
        &self,
        f: impl FnOnce(&mut PendingSet) -> (T, bool) + Send,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.lock().await;
        let _file_lock = self.lock_file(LockMode::Exclusive).await?;
        let mut set = self.load().await?;
        let (out, changed) = f(&mut set);
        if changed {
            self.persist(&set).await?;
        }
        Ok(out)
    }

    async fn read(&self) -> Result<PendingSet, StoreError> {
        let _guard = self.lock.lock().await;
        let _file_lock = self.lock_file(LockMode::Shared).await?;
        self.load().await
    }
}

#[async_trait]
impl PendingLeadStore for JsonFileStore {
    async fn save(&self, lead: &LeadRecord) -> Result<(), StoreError> {
        self.update(|set| {
            set.upsert(lead);
            ((), true)
        })
        .await
    }

    async fn get(&self, id: LeadId) -> Result<Option<StoredLead>, StoreError> {
        Ok(self.read().await?.get(id).cloned())
    }

    async fn list_pending(&self) -> Result<Vec<LeadRecord>, StoreError> {
        Ok(self.read().await?.pending())
    }

    async fn remove(&self, id: LeadId) -> Result<(), StoreError> {
        self.update(|set| ((), set.remove(id))).await
    }

    async fn record_failure(
        &self,
        id: LeadId,
        error: &str,
    ) -> Result<Option<LeadRecord>, StoreError> {
        let now = Utc::now();
        self.update(|set| {
            let updated = set.record_failure(id, error, now);
            let changed = updated.is_some();
            (updated, changed)
        })
        .await
    }

    async fn mark_given_up(&self, id: LeadId, reason: &str) -> Result<(), StoreError> {
        let now = Utc::now();
        self.update(|set| ((), set.mark_given_up(id, reason, now)))
            .await
    }

    async fn requeue(&self, id: LeadId) -> Result<(), StoreError> {
        let found = self
            .update(|set| {
                let found = set.requeue(id);
                (found, found)
            })
            .await?;
        if found {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn entries(&self) -> Result<Vec<StoredLead>, StoreError> {
        Ok(self.read().await?.entries)
    }
}
