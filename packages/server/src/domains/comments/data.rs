use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::common::validation::{char_bounds, invalid, is_uuid};
use crate::common::{ActionError, PostId};
use crate::domains::comments::models::{CommentFields, CommentFilter};

/// Public comment form.
///
/// Has no `approved` field: anything a caller sends under
/// that name is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct CommentInput {
    #[validate(custom = "validate_post_id")]
    pub post_id: String,

    #[validate(custom = "validate_author_name")]
    pub author_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub author_email: String,

    #[validate(custom = "validate_comment_content")]
    pub content: String,
}

fn validate_post_id(value: &str) -> Result<(), ValidationError> {
    if is_uuid(value) {
        Ok(())
    } else {
        Err(invalid("uuid", "Invalid post ID"))
    }
}

fn validate_author_name(value: &str) -> Result<(), ValidationError> {
    char_bounds(
        value,
        2,
        Some(50),
        "Name must be at least 2 characters",
        "Name is too long",
    )
}

fn validate_comment_content(value: &str) -> Result<(), ValidationError> {
    char_bounds(
        value,
        10,
        Some(1000),
        "Comment must be at least 10 characters",
        "Comment is too long",
    )
}

impl CommentInput {
    /// Columns for a new comment. Always unapproved.
    ///
    /// Returns a field error if called on input whose `post_id` is not a UUID.
    pub fn to_fields(&self) -> Result<CommentFields, ActionError> {
        let post_id = PostId::parse(&self.post_id)
            .map_err(|_| ActionError::field("post_id", "Invalid post ID"))?;
        Ok(CommentFields {
            post_id,
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            content: self.content.clone(),
            approved: false,
        })
    }
}

/// Query string for comment listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentListQuery {
    pub post_id: Option<String>,
    pub approved_only: Option<bool>,
}

impl CommentListQuery {
    pub fn for_post(post_id: PostId) -> Self {
        Self {
            post_id: Some(post_id.to_string()),
            approved_only: None,
        }
    }

    /// Builds the filter, using `default_approved_only` when the flag is absent.
    pub fn into_filter(self, default_approved_only: bool) -> Result<CommentFilter, ActionError> {
        let post_id = match self.post_id.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                PostId::parse(raw).map_err(|_| ActionError::field("post_id", "Invalid post ID"))?,
            ),
        };
        Ok(CommentFilter {
            post_id,
            approved_only: self.approved_only.unwrap_or(default_approved_only),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::validation::field_errors;

    fn valid() -> CommentInput {
        CommentInput {
            post_id: PostId::new().to_string(),
            author_name: "Ada".to_string(),
            author_email: "ada@example.com".to_string(),
            content: "Great write-up, thanks!".to_string(),
        }
    }

    #[test]
    fn valid_comment_is_stored_unapproved() {
        let input = valid();
        assert!(input.validate().is_ok());
        assert!(!input.to_fields().unwrap().approved);
    }

    #[test]
    fn nine_character_comment_is_too_short() {
        let input = CommentInput {
            content: "123456789".to_string(),
            ..valid()
        };
        let errors = field_errors(&input.validate().unwrap_err());
        assert_eq!(errors["content"], vec!["Comment must be at least 10 characters"]);
    }

    #[test]
    fn reports_each_bad_field() {
        let input = CommentInput {
            post_id: "not-a-uuid".to_string(),
            author_name: "A".to_string(),
            author_email: "nope".to_string(),
            content: "x".repeat(1001),
        };
        let errors = field_errors(&input.validate().unwrap_err());
        assert_eq!(errors["post_id"], vec!["Invalid post ID"]);
        assert_eq!(errors["author_name"], vec!["Name must be at least 2 characters"]);
        assert_eq!(errors["author_email"], vec!["Invalid email address"]);
        assert_eq!(errors["content"], vec!["Comment is too long"]);
    }

    #[test]
    fn caller_supplied_approval_is_ignored() {
        let raw = serde_json::json!({
            "post_id": PostId::new().to_string(),
            "author_name": "Mallory",
            "author_email": "mallory@example.com",
            "content": "Approve me please, thanks",
            "approved": true,
        });
        let input: CommentInput = serde_json::from_value(raw).unwrap();
        assert!(!input.to_fields().unwrap().approved);
    }

    #[test]
    fn list_query_defaults() {
        let filter = CommentListQuery::default().into_filter(true).unwrap();
        assert_eq!(filter.post_id, None);
        assert!(filter.approved_only);

        let post_id = PostId::new();
        let filter = CommentListQuery {
            approved_only: Some(false),
            ..CommentListQuery::for_post(post_id)
        }
        .into_filter(true)
        .unwrap();
        assert_eq!(filter.post_id, Some(post_id));
        assert!(!filter.approved_only);

        let query = CommentListQuery {
            post_id: Some("bogus".to_string()),
            approved_only: None,
        };
        assert!(query.into_filter(true).is_err());
    }
}
