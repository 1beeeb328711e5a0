use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{ArchiveEntry, ArchiveKey, ArchiveSummary},
    repositories::ArchiveRepository,
};

/// Archive of resolved item sets. Writes to one key are serialized; writes to
/// different keys proceed independently.
pub struct ArchiveStore {
    repository: Arc<dyn ArchiveRepository>,
    write_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl ArchiveStore {
    pub fn new(repository: Arc<dyn ArchiveRepository>) -> Self {
        Self {
            repository,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, key_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.write_locks.lock().unwrap_or_else(|p| p.into_inner());
        locks
            .entry(key_id.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Drops the key's lock once no other writer holds or awaits it, so the
    /// map only carries keys with a write in flight.
    fn release_lock(&self, key_id: &str, lock: Arc<AsyncMutex<()>>) {
        let mut locks = self.write_locks.lock().unwrap_or_else(|p| p.into_inner());
        if Arc::strong_count(&lock) == 2 {
            locks.remove(key_id);
        }
    }

    #[cfg(test)]
    fn lock_count(&self) -> usize {
        self.write_locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub async fn get(&self, key: &ArchiveKey) -> AppResult<Option<ArchiveEntry>> {
        self.repository.get(key).await
    }

    /// Like `get`, but a missing entry is `NotFound`.
    pub async fn load(&self, key: &ArchiveKey) -> AppResult<ArchiveEntry> {
        self.repository.get(key).await?.ok_or_else(|| {
            AppError::NotFound(format!("No archived {} for '{}'", key.content_kind.as_str(), key.key_id()))
        })
    }

    /// Last write wins.
    pub async fn put(&self, entry: &ArchiveEntry) -> AppResult<()> {
        let key_id = entry.key.key_id();
        let lock = self.lock_for(&key_id);
        let result = {
            let _guard = lock.lock().await;
            self.repository.put(entry).await
        };
        self.release_lock(&key_id, lock);
        result?;

        log::info!(
            "Archived {} items under {} ({})",
            entry.item_count,
            key_id,
            entry.content_hash
        );
        Ok(())
    }

    pub async fn list(&self, subject_id: Option<&str>) -> AppResult<Vec<ArchiveSummary>> {
        let subject_id = subject_id.map(str::trim).filter(|s| !s.is_empty());
        self.repository.list(subject_id).await
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.repository.health_check().await
    }
}
