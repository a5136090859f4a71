//! Shared validation rules used by the domain input types.
//!
//! Field rules are written as `validator` custom functions so each failure
//! carries the exact message shown next to the form field.

use std::borrow::Cow;
use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

lazy_static! {
    /// Lowercase letters, digits and hyphens. Used for post and tag slugs.
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9-]+$").unwrap();
}

/// Field name -> messages, in field order.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const SLUG_PATTERN_MESSAGE: &str =
    "Slug can only contain lowercase letters, numbers, and hyphens";

/// Builds a `ValidationError` carrying a user-facing message.
pub fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Character-count bounds with separate too-short and too-long messages.
pub fn char_bounds(
    value: &str,
    min: usize,
    max: Option<usize>,
    too_short: &'static str,
    too_long: &'static str,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min {
        return Err(invalid("length", too_short));
    }
    if let Some(max) = max {
        if len > max {
            return Err(invalid("length", too_long));
        }
    }
    Ok(())
}

/// Required slug of at most `max` characters matching [`SLUG_REGEX`].
pub fn slug_rules(value: &str, max: usize) -> Result<(), ValidationError> {
    char_bounds(value, 1, Some(max), "Slug is required", "Slug is too long")?;
    if !is_valid_slug(value) {
        return Err(invalid("slug", SLUG_PATTERN_MESSAGE));
    }
    Ok(())
}

pub fn is_valid_slug(value: &str) -> bool {
    SLUG_REGEX.is_match(value)
}

pub fn is_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// Flattens `validator` output into the field-keyed map returned to callers.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
