//! Pending-lead store
//!
//! Durable holding area for leads awaiting CRM confirmation. A lead is
//! written here before any delivery attempt and only removed once the CRM
//! has accepted it.

mod file;
mod memory;
mod types;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use types::{EntryState, StoreError, StoredLead};

pub(crate) use types::PendingSet;

use crate::lead::{LeadId, LeadRecord};
use async_trait::async_trait;

/// Trait for pending-lead store implementations
///
/// All writes are idempotent so the fast path and the sweep can touch the
/// same entry without coordinating.
#[async_trait]
pub trait PendingLeadStore: Send + Sync {
    /// Insert or overwrite the entry for `lead.id()`, keeping its position
    async fn save(&self, lead: &LeadRecord) -> Result<(), StoreError>;

    /// The entry for `id`, pending or given up
    async fn get(&self, id: LeadId) -> Result<Option<StoredLead>, StoreError>;

    /// Leads still awaiting delivery, in insertion order
    async fn list_pending(&self) -> Result<Vec<LeadRecord>, StoreError>;

    /// Delete an entry after confirmed delivery; unknown ids are a no-op
    async fn remove(&self, id: LeadId) -> Result<(), StoreError>;

    /// Count a failed attempt; `None` when the entry is already gone
    async fn record_failure(
        &self,
        id: LeadId,
        error: &str,
    ) -> Result<Option<LeadRecord>, StoreError>;

    /// Stop retrying an entry but keep it for inspection
    async fn mark_given_up(&self, id: LeadId, reason: &str) -> Result<(), StoreError>;

    /// Return a given-up entry to the pending set
    async fn requeue(&self, id: LeadId) -> Result<(), StoreError>;

    /// Every entry, pending or given up
    async fn entries(&self) -> Result<Vec<StoredLead>, StoreError>;
}
