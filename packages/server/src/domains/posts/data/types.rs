use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::common::validation::{char_bounds, invalid, is_uuid, slug_rules};
use crate::common::{ActionError, Page, PageArgs, TagId};
use crate::domains::posts::models::PostFields;

pub const POST_SLUG_MAX: usize = 200;

/// Post form as submitted by the admin editor.
///
/// Used for both create and update. Missing required strings deserialize as
/// empty and fail validation with the "required" message.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct PostInput {
    #[validate(custom = "validate_title")]
    pub title: String,

    #[validate(custom = "validate_post_slug")]
    pub slug: String,

    #[validate(custom = "validate_content")]
    pub content: String,

    #[validate(length(max = 300, message = "Excerpt is too long"))]
    pub excerpt: Option<String>,

    pub published: bool,

    #[validate(range(min = 1, message = "Reading time must be a positive number"))]
    pub reading_time_minutes: Option<i32>,

    #[validate(length(max = 60, message = "Meta title is too long"))]
    pub meta_title: Option<String>,

    #[validate(length(max = 160, message = "Meta description is too long"))]
    pub meta_description: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub og_image: Option<String>,

    #[validate(url(message = "Invalid image URL"))]
    pub featured_image: Option<String>,

    pub featured_image_alt: Option<String>,

    /// `None` leaves existing links alone; `Some(vec![])` clears them.
    #[validate(custom = "validate_tag_ids")]
    pub tag_ids: Option<Vec<String>>,
}

fn validate_title(value: &str) -> Result<(), ValidationError> {
    char_bounds(value, 1, Some(200), "Title is required", "Title is too long")
}

fn validate_post_slug(value: &str) -> Result<(), ValidationError> {
    slug_rules(value, POST_SLUG_MAX)
}

fn validate_content(value: &str) -> Result<(), ValidationError> {
    let message = "Content must be at least 10 characters";
    char_bounds(value, 10, None, message, message)
}

fn validate_tag_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.iter().all(|id| is_uuid(id)) {
        Ok(())
    } else {
        Err(invalid("uuid", "Invalid tag ID"))
    }
}

/// An empty form field is stored as NULL
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

impl PostInput {
    /// Writable columns, with the tag selection split off.
    pub fn to_fields(&self) -> PostFields {
        PostFields {
            slug: self.slug.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            excerpt: non_blank(&self.excerpt),
            published: self.published,
            reading_time_minutes: self.reading_time_minutes,
            meta_title: non_blank(&self.meta_title),
            meta_description: non_blank(&self.meta_description),
            og_image: non_blank(&self.og_image),
            featured_image: non_blank(&self.featured_image),
            featured_image_alt: non_blank(&self.featured_image_alt),
        }
    }

    /// Parsed tag selection. Only meaningful after `validate()`.
    pub fn tag_ids(&self) -> Option<Vec<TagId>> {
        self.tag_ids.as_ref().map(|ids| {
            ids.iter()
                .filter_map(|id| TagId::parse(id).ok())
                .collect()
        })
    }
}

/// Query string for post listings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListPostsQuery {
    pub fn page_args(&self) -> PageArgs {
        PageArgs {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

/// Full-text-ish search over published posts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchInput {
    #[serde(default, alias = "q")]
    pub query: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub const MAX_SEARCH_LIMIT: i64 = 50;

impl SearchInput {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Checks the query length and window, returning the query and page.
    pub fn validate(&self) -> Result<(String, Page), ActionError> {
        let query_check = char_bounds(
            &self.query,
            1,
            Some(100),
            "Search query is required",
            "Search query is too long",
        );
        let page = PageArgs {
            limit: self.limit,
            offset: self.offset,
        }
        .validate(MAX_SEARCH_LIMIT);

        match (query_check, page) {
            (Ok(()), Ok(page)) => Ok((self.query.clone(), page)),
            (Ok(()), Err(err)) => Err(err),
            (Err(query_err), page) => {
                let mut fields = match page {
                    Err(ActionError::Validation(fields)) => fields,
                    _ => Default::default(),
                };
                let message = query_err
                    .message
                    .map(|m| m.to_string())
                    .unwrap_or_default();
                fields.insert("query".to_string(), vec![message]);
                Err(ActionError::Validation(fields))
            }
        }
    }
}
