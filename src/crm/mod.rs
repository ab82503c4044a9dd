//! CRM ingestion module
//!
//! Delivers lead payloads to the marketing CRM webhook

mod http;
mod types;

pub use http::{HttpCrmClient, HttpCrmConfig};
pub use types::{CrmPayload, DeliveryError};

use crate::lead::LeadRecord;
use async_trait::async_trait;

/// Trait for CRM delivery implementations
#[async_trait]
pub trait CrmClient: Send + Sync {
    /// Deliver one lead; `Ok` only when the CRM confirmed acceptance
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), DeliveryError>;
}
