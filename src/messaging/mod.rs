//! Messaging handoff module
//!
//! Builds pre-filled WhatsApp chat links for post-submit redirects

mod whatsapp;

pub use whatsapp::{render_template, whatsapp_link, WHATSAPP_BASE_URL};

use thiserror::Error;

/// Messaging errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagingError {
    /// Recipient number has the wrong number of digits
    #[error("invalid phone number: {0}")]
    InvalidNumber(String),
    /// Base URL could not be parsed
    #[error("invalid link: {0}")]
    InvalidUrl(String),
}
