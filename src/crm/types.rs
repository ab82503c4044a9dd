//! CRM payload and error types

use crate::lead::LeadRecord;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Body posted to the CRM ingestion endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrmPayload<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub phone: &'a str,
    pub tags: &'a BTreeSet<String>,
    pub fields: &'a BTreeMap<String, String>,
}

impl<'a> From<&'a LeadRecord> for CrmPayload<'a> {
    fn from(lead: &'a LeadRecord) -> Self {
        Self {
            email: lead.email(),
            name: lead.name(),
            phone: lead.phone(),
            tags: lead.tags(),
            fields: lead.fields(),
        }
    }
}

/// Delivery errors; all of them leave the lead pending
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Network failure before a response arrived
    #[error("CRM transport error: {0}")]
    Transport(String),
    /// No response within the configured timeout
    #[error("CRM request timed out")]
    Timeout,
    /// CRM answered with a non-success status
    #[error("CRM rejected lead: {status} - {body}")]
    Rejected { status: u16, body: String },
}

impl From<reqwest::Error> for DeliveryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DeliveryError::Timeout
        } else {
            DeliveryError::Transport(e.to_string())
        }
    }
}
