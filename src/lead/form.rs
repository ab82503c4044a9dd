//! Lead-capture form definitions

use serde::{Deserialize, Serialize};

/// Default post-submit page
pub const THANK_YOU_PATH: &str = "/obrigado";

/// A page-level form and what happens after it is submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormDefinition {
    /// Form identifier, also attached as a `form:<id>` tag
    pub id: String,

    /// Campaign tags added to every lead from this form
    #[serde(default)]
    pub tags: Vec<String>,

    /// Custom fields that must be filled in
    #[serde(default)]
    pub required_fields: Vec<String>,

    /// Where the visitor goes once the form validates
    #[serde(default)]
    pub handoff: Handoff,
}

/// Post-submit navigation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Handoff {
    /// Internal thank-you page
    #[serde(rename = "thank_you")]
    ThankYou {
        #[serde(default = "default_thank_you_path")]
        path: String,
    },
    /// WhatsApp chat pre-filled from a message template
    #[serde(rename = "whatsapp")]
    WhatsApp {
        /// Falls back to `messaging.greeting` when unset
        #[serde(default)]
        template: Option<String>,
    },
}

fn default_thank_you_path() -> String {
    THANK_YOU_PATH.to_string()
}

impl Default for Handoff {
    fn default() -> Self {
        Handoff::ThankYou {
            path: default_thank_you_path(),
        }
    }
}

impl FormDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: Vec::new(),
            required_fields: Vec::new(),
            handoff: Handoff::default(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_required(mut self, fields: &[&str]) -> Self {
        self.required_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_handoff(mut self, handoff: Handoff) -> Self {
        self.handoff = handoff;
        self
    }
}

/// Forms offered by the site when none are configured
pub fn builtin_forms() -> Vec<FormDefinition> {
    vec![
        FormDefinition::new("contato")
            .with_tags(&["contato"])
            .with_handoff(Handoff::WhatsApp {
                template: Some(
                    "Olá! Meu nome é {name}. Tenho interesse em {interesse}.".to_string(),
                ),
            }),
        FormDefinition::new("robos").with_tags(&["robos", "trial"]),
        FormDefinition::new("copy-trading").with_tags(&["copy-trading"]),
        FormDefinition::new("mesa-proprietaria")
            .with_tags(&["mesa-proprietaria", "combo"])
            .with_required(&["budget"]),
    ]
}
