//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field errors accumulate into a single map keyed by the wire-format field
//! name so a client can render every inline error from one response. This
//! layer is independent of the coarse permission gate: both checks run on a
//! write request, and each reports its own error category.

use std::collections::BTreeMap;

use serde_json::{Value, json};

use crate::domain::{EmailAddress, Error};

/// Message reported for a required field that was not submitted.
pub(crate) const REQUIRED_MESSAGE: &str = "this field is required";

/// Accumulator for field-scoped validation failures.
///
/// Keys are wire-format (lowerCamelCase) field names; each carries one or
/// more human-readable messages.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    errors: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a failure for `field`.
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    /// Record that a required field was missing.
    pub(crate) fn missing(&mut self, field: &'static str) {
        self.push(field, REQUIRED_MESSAGE);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Build the error for a single field failure directly.
    pub(crate) fn single(field: &'static str, message: impl Into<String>) -> Error {
        let mut errors = Self::new();
        errors.push(field, message);
        errors.into_error()
    }

    /// Succeed when no failure was recorded, otherwise produce the combined
    /// `invalid_request` error.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        Err(self.into_error())
    }

    fn into_error(self) -> Error {
        let details: serde_json::Map<String, Value> = self
            .errors
            .into_iter()
            .map(|(field, messages)| (field.to_owned(), json!(messages)))
            .collect();
        Error::invalid_request("validation failed").with_details(Value::Object(details))
    }
}

/// Validate an email candidate, recording any failure under `field`.
pub(crate) fn parse_email(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: &str,
) -> Option<EmailAddress> {
    match EmailAddress::new(raw) {
        Ok(email) => Some(email),
        Err(error) => {
            errors.push(field, error.to_string());
            None
        }
    }
}

/// Validate a required free-text field, recording an error when blank.
pub(crate) fn non_blank(
    errors: &mut FieldErrors,
    field: &'static str,
    raw: &str,
    message: &'static str,
) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(field, message);
        return None;
    }
    Some(trimmed.to_owned())
}
