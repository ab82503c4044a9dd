//! Store types

use crate::lead::{LeadId, LeadRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk layout version
pub(crate) const STORE_VERSION: u32 = 1;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying read or write failed (quota, permissions, ...)
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// Persisted document could not be decoded
    #[error("stored data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    /// No entry with this id
    #[error("lead not found: {0}")]
    NotFound(LeadId),
    /// Backend refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Retry state of a stored entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Picked up by every sweep
    Pending,
    /// Retry policy exhausted; kept until delivered manually or cleared
    GivenUp,
}

/// A lead plus its delivery bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLead {
    pub lead: LeadRecord,
    pub state: EntryState,
    #[serde(default)]
    pub last_error: Option<String>,
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub given_up_at: Option<DateTime<Utc>>,
}

impl StoredLead {
    fn new(lead: LeadRecord) -> Self {
        Self {
            lead,
            state: EntryState::Pending,
            last_error: None,
            last_attempt_at: None,
            given_up_at: None,
        }
    }
}

/// Insertion-ordered entry list shared by the store backends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PendingSet {
    pub version: u32,
    pub entries: Vec<StoredLead>,
}

impl Default for PendingSet {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            entries: Vec::new(),
        }
    }
}

impl PendingSet {
    fn position(&self, id: LeadId) -> Option<usize> {
        self.entries.iter().position(|e| e.lead.id() == id)
    }

    pub fn upsert(&mut self, lead: &LeadRecord) {
        match self.position(lead.id()) {
            Some(idx) => self.entries[idx].lead = lead.clone(),
            None => self.entries.push(StoredLead::new(lead.clone())),
        }
    }

    pub fn get(&self, id: LeadId) -> Option<&StoredLead> {
        self.position(id).map(|idx| &self.entries[idx])
    }

    pub fn pending(&self) -> Vec<LeadRecord> {
        self.entries
            .iter()
            .filter(|e| e.state == EntryState::Pending)
            .map(|e| e.lead.clone())
            .collect()
    }

    pub fn remove(&mut self, id: LeadId) -> bool {
        match self.position(id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn record_failure(
        &mut self,
        id: LeadId,
        error: &str,
        now: DateTime<Utc>,
    ) -> Option<LeadRecord> {
        let idx = self.position(id)?;
        let entry = &mut self.entries[idx];
        entry.lead.record_attempt();
        entry.last_error = Some(error.to_string());
        entry.last_attempt_at = Some(now);
        Some(entry.lead.clone())
    }

    pub fn mark_given_up(&mut self, id: LeadId, reason: &str, now: DateTime<Utc>) -> bool {
        match self.position(id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.state = EntryState::GivenUp;
                entry.last_error = Some(reason.to_string());
                entry.given_up_at = Some(now);
                true
            }
            None => false,
        }
    }

    pub fn requeue(&mut self, id: LeadId) -> bool {
        match self.position(id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.state = EntryState::Pending;
                entry.given_up_at = None;
                true
            }
            None => false,
        }
    }
}
