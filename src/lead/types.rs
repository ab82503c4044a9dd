//! Lead validation types

use std::fmt;
use thiserror::Error;

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIssue {
    /// Required field left empty
    Missing,
    /// Present but not in an acceptable shape
    Malformed,
}

/// A single rejected field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub issue: FieldIssue,
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: FieldIssue::Missing,
        }
    }

    pub fn malformed(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: FieldIssue::Malformed,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issue {
            FieldIssue::Missing => write!(f, "{} is required", self.field),
            FieldIssue::Malformed => write!(f, "{} is malformed", self.field),
        }
    }
}

/// Form input rejected before anything is stored or sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid form input: {}", join(.errors))]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Whether the given field is among the rejected ones
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

fn join(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
