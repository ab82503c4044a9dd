//! Lead capture module
//!
//! Turns raw form input into validated lead records

mod collector;
mod form;
mod types;

pub use collector::{FormCollector, FormFields};
pub use form::{builtin_forms, FormDefinition, Handoff, THANK_YOU_PATH};
pub use types::{FieldError, FieldIssue, ValidationError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Lead identifier, generated at collection time
pub type LeadId = Uuid;

/// A prospective customer's contact and interest data
///
/// Only `attempt_count` changes after collection; everything else is fixed
/// when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    id: LeadId,
    form_id: String,
    email: String,
    name: String,
    phone: String,
    tags: BTreeSet<String>,
    fields: BTreeMap<String, String>,
    created_at: DateTime<Utc>,
    #[serde(default)]
    attempt_count: u32,
}

impl LeadRecord {
    pub(crate) fn new(
        form_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        tags: BTreeSet<String>,
        fields: BTreeMap<String, String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
            email: email.into(),
            name: name.into(),
            phone: phone.into(),
            tags,
            fields,
            created_at,
            attempt_count: 0,
        }
    }

    pub fn id(&self) -> LeadId {
        self.id
    }

    /// Form the lead was captured from
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    /// Natural dedup key on the CRM side
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Campaign/form labels
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Opaque custom fields (market of interest, budget tier, ...)
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Delivery attempts made so far
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Time elapsed since collection
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.created_at
    }

    pub(crate) fn record_attempt(&mut self) {
        self.attempt_count = self.attempt_count.saturating_add(1);
    }
}
