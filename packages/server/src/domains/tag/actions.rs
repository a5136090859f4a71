//! Tag actions - list, create, delete
//!
//! Tag uniqueness is left to the store's slug constraint; a duplicate slug
//! comes back as a store error.

use tracing::info;
use validator::Validate;

use crate::common::{ActionError, TagId};
use crate::domains::tag::data::TagInput;
use crate::domains::tag::models::Tag;
use crate::kernel::{ServerDeps, ALL_POST_PAGES_PATH, BLOG_INDEX_PATH};

/// All tags, by name.
pub async fn list_tags(deps: &ServerDeps) -> Result<Vec<Tag>, ActionError> {
    deps.store()
        .list_tags()
        .await
        .map_err(|e| ActionError::store("Error fetching tags", e))
}

pub async fn create_tag(input: TagInput, deps: &ServerDeps) -> Result<Tag, ActionError> {
    input.validate()?;

    info!(slug = %input.slug, "Creating tag");

    let tag = deps
        .store()
        .insert_tag(TagId::new(), &input.to_fields())
        .await
        .map_err(|e| ActionError::store("Failed to create tag", e))?;

    deps.revalidate(&[BLOG_INDEX_PATH]).await;
    Ok(tag)
}

/// Delete a tag. Its post links go with it; the posts themselves are untouched.
pub async fn delete_tag(id: TagId, deps: &ServerDeps) -> Result<(), ActionError> {
    info!(tag_id = %id, "Deleting tag");

    deps.store()
        .delete_tag(id)
        .await
        .map_err(|e| ActionError::store("Failed to delete tag", e))?;

    // Post pages show their tags
    deps.revalidate(&[BLOG_INDEX_PATH, ALL_POST_PAGES_PATH]).await;
    Ok(())
}
