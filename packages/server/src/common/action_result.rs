//! Uniform action outcome.
//!
//! Actions return `Result<T, ActionError>`. At the boundary the result is
//! converted into [`ActionResult`], serialized as
//! `{ "success": bool, "data"?: T, "error"?: string | { field: [messages] } }`.

use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use super::validation::{field_errors, FieldErrors};

#[derive(Error, Debug)]
pub enum ActionError {
    /// Input rejected before any store call.
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    NotFound(String),

    /// The remote store (or storage bucket) refused or failed the call.
    #[error("{0}")]
    Store(String),
}

impl ActionError {
    pub fn not_found(what: &str) -> Self {
        ActionError::NotFound(format!("{} not found", what))
    }

    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        ActionError::Validation(errors)
    }

    /// Logs a store failure and converts it into the message surfaced to callers.
    pub fn store(context: &str, err: anyhow::Error) -> Self {
        tracing::error!(error = %err, "{}", context);
        ActionError::Store(err.to_string())
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ActionError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for ActionError {
    fn from(errors: ValidationErrors) -> Self {
        ActionError::Validation(field_errors(&errors))
    }
}

/// Error half of [`ActionResult`]: a message or a field-keyed map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    Fields(FieldErrors),
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: ErrorPayload) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

impl From<ActionError> for ErrorPayload {
    fn from(err: ActionError) -> Self {
        match err {
            ActionError::Validation(fields) => ErrorPayload::Fields(fields),
            other => ErrorPayload::Message(other.to_string()),
        }
    }
}

impl<T> From<Result<T, ActionError>> for ActionResult<T> {
    fn from(result: Result<T, ActionError>) -> Self {
        match result {
            Ok(data) => ActionResult::ok(data),
            Err(err) => ActionResult::err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_omits_error() {
        let result: ActionResult<u32> = Ok(7).into();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": true, "data": 7 })
        );
    }

    #[test]
    fn validation_failure_serializes_as_field_map() {
        let result: ActionResult<()> =
            Err(ActionError::field("slug", "Slug is required")).into();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "error": { "slug": ["Slug is required"] } })
        );
    }

    #[test]
    fn other_failures_serialize_as_message() {
        let result: ActionResult<()> = Err(ActionError::not_found("Post")).into();
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({ "success": false, "error": "Post not found" })
        );
    }
}
