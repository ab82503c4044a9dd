//! Form collector: raw input to validated lead records
//!
//! Collection is pure. No storage or network access happens here, and the
//! caller keeps its input so a rejected form can be shown again as typed.

use super::form::builtin_forms;
use super::{FieldError, FormDefinition, LeadRecord, ValidationError};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// Raw values typed into a form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Custom fields such as market of interest or budget tier
    pub fields: BTreeMap<String, String>,
}

impl FormFields {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
}

/// Validates form input against the known form definitions
#[derive(Debug, Clone)]
pub struct FormCollector {
    forms: BTreeMap<String, FormDefinition>,
    default_tags: Vec<String>,
}

impl FormCollector {
    /// Create a collector; an empty form list falls back to the built-in forms
    pub fn new(forms: Vec<FormDefinition>, default_tags: Vec<String>) -> Self {
        let forms = if forms.is_empty() {
            builtin_forms()
        } else {
            forms
        };

        Self {
            forms: forms.into_iter().map(|f| (f.id.clone(), f)).collect(),
            default_tags,
        }
    }

    /// Look up a form by id
    pub fn form(&self, id: &str) -> Option<&FormDefinition> {
        self.forms.get(id)
    }

    pub fn forms(&self) -> impl Iterator<Item = &FormDefinition> {
        self.forms.values()
    }

    /// Validate `input` for `form` and build a lead record
    ///
    /// Every failing field is reported, not only the first one.
    pub fn collect(
        &self,
        form: &FormDefinition,
        input: &FormFields,
    ) -> Result<LeadRecord, ValidationError> {
        let mut errors = Vec::new();

        let name = input.name.trim();
        if name.is_empty() {
            errors.push(FieldError::missing("name"));
        }

        let email = input.email.trim().to_lowercase();
        if email.is_empty() {
            errors.push(FieldError::missing("email"));
        } else if !is_minimal_email(&email) {
            errors.push(FieldError::malformed("email"));
        }

        let phone = input.phone.trim();
        if phone.is_empty() {
            errors.push(FieldError::missing("phone"));
        }

        let fields: BTreeMap<String, String> = input
            .fields
            .iter()
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .filter(|(k, v)| !k.is_empty() && !v.is_empty())
            .collect();

        for required in &form.required_fields {
            if !fields.contains_key(required) {
                errors.push(FieldError::missing(required.clone()));
            }
        }

        if !errors.is_empty() {
            tracing::debug!(form = %form.id, ?errors, "Form rejected");
            return Err(ValidationError { errors });
        }

        let tags: BTreeSet<String> = self
            .default_tags
            .iter()
            .chain(form.tags.iter())
            .cloned()
            .chain(std::iter::once(format!("form:{}", form.id)))
            .collect();

        Ok(LeadRecord::new(
            form.id.clone(),
            name,
            email,
            phone,
            tags,
            fields,
            Utc::now(),
        ))
    }
}

/// One `@` with something on both sides and no whitespace
fn is_minimal_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
