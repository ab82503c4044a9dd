//! In-memory pending-lead store

use super::{PendingLeadStore, PendingSet, StoreError, StoredLead};
use crate::lead::{LeadId, LeadRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Non-durable store for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    set: Arc<RwLock<PendingSet>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, pending or given up
    pub async fn len(&self) -> usize {
        self.set.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl PendingLeadStore for MemoryStore {
    async fn save(&self, lead: &LeadRecord) -> Result<(), StoreError> {
        self.set.write().await.upsert(lead);
        Ok(())
    }

    async fn get(&self, id: LeadId) -> Result<Option<StoredLead>, StoreError> {
        Ok(self.set.read().await.get(id).cloned())
    }

    async fn list_pending(&self) -> Result<Vec<LeadRecord>, StoreError> {
        Ok(self.set.read().await.pending())
    }

    async fn remove(&self, id: LeadId) -> Result<(), StoreError> {
        self.set.write().await.remove(id);
        Ok(())
    }

    async fn record_failure(
        &self,
        id: LeadId,
        error: &str,
    ) -> Result<Option<LeadRecord>, StoreError> {
        Ok(self.set.write().await.record_failure(id, error, Utc::now()))
    }

    async fn mark_given_up(&self, id: LeadId, reason: &str) -> Result<(), StoreError> {
        self.set.write().await.mark_given_up(id, reason, Utc::now());
        Ok(())
    }

    async fn requeue(&self, id: LeadId) -> Result<(), StoreError> {
        if self.set.write().await.requeue(id) {
            Ok(())
        } else {
            Err(StoreError::NotFound(id))
        }
    }

    async fn entries(&self) -> Result<Vec<StoredLead>, StoreError> {
        Ok(self.set.read().await.entries.clone())
    }
}
