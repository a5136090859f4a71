// Common types and utilities shared across the application

pub mod action_result;
pub mod auth;
pub mod entity_ids;
pub mod id;
pub mod pagination;
pub mod validation;

pub use action_result::{ActionError, ActionResult, ErrorPayload};
pub use auth::AuthError;
pub use entity_ids::*;
pub use id::Id;
pub use pagination::{Page, PageArgs};
pub use validation::FieldErrors;
