//! Common validation utilities

use serde::Serialize;
use std::fmt;

/// A single rejected field with the reason it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of violations gathered while checking a whole input at once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations {
    items: Vec<FieldViolation>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.items.push(FieldViolation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn into_vec(self) -> Vec<FieldViolation> {
        self.items
    }
}

/// Common validation functions
pub mod validators {
    use url::Url;

    /// Check if a string is not empty once surrounding whitespace is removed
    pub fn not_blank(value: &str) -> bool {
        !value.trim().is_empty()
    }

    /// Check if an email address is syntactically valid
    pub fn is_valid_email(email: &str) -> bool {
        validator::validate_email(email)
    }

    /// Parse an absolute `http`/`https` URL with a host
    pub fn parse_http_url(value: &str) -> Result<Url, &'static str> {
        let url = Url::parse(value.trim()).map_err(|_| "must be a well-formed URL")?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err("must use the http or https scheme");
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err("must include a host");
        }
        Ok(url)
    }
}
