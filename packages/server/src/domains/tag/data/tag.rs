use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::common::validation::{char_bounds, slug_rules};
use crate::domains::tag::models::TagFields;

pub const TAG_SLUG_MAX: usize = 50;

/// Tag form from the admin tag manager
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct TagInput {
    #[validate(custom = "validate_name")]
    pub name: String,

    #[validate(custom = "validate_tag_slug")]
    pub slug: String,
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    char_bounds(value, 1, Some(50), "Tag name is required", "Tag name is too long")
}

fn validate_tag_slug(value: &str) -> Result<(), ValidationError> {
    slug_rules(value, TAG_SLUG_MAX)
}

impl TagInput {
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
        }
    }

    pub fn to_fields(&self) -> TagFields {
        TagFields {
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}
