//! Post CRUD actions - entry-point functions for post operations
//!
//! Called from the HTTP route handlers and the seed binary. Actions validate
//! their input, talk to the store through `ServerDeps`, revalidate the
//! affected public pages, and return final models.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use validator::Validate;

use crate::common::{ActionError, PageArgs, PostId};
use crate::domains::posts::actions::tags::{link_post_tags, sync_post_tags};
use crate::domains::posts::data::{PostInput, SearchInput};
use crate::domains::posts::models::{Post, PostFilter, PostWithTags};
use crate::kernel::{post_path, ServerDeps, BLOG_INDEX_PATH};

pub const MAX_LIST_LIMIT: i64 = 100;

/// List posts, newest first.
///
/// Public listings (drafts excluded) are served from the page cache when
/// possible. Admin listings always hit the store.
pub async fn list_posts(
    args: PageArgs,
    include_unpublished: bool,
    deps: &ServerDeps,
) -> Result<Vec<Post>, ActionError> {
    let page = args.validate(MAX_LIST_LIMIT)?;

    if include_unpublished {
        return deps
            .store()
            .list_posts(PostFilter::all(page))
            .await
            .map_err(|e| ActionError::store("Error fetching posts", e));
    }

    if let Some(cached) = deps.page_cache.listing(page).await {
        debug!(limit = page.limit, offset = page.offset, "Post listing served from cache");
        return Ok(cached.as_ref().clone());
    }

    let ticket = deps.page_cache.ticket();
    let posts = deps
        .store()
        .list_posts(PostFilter::published(page))
        .await
        .map_err(|e| ActionError::store("Error fetching posts", e))?;

    deps.page_cache
        .store_listing(page, Arc::new(posts.clone()), ticket)
        .await;

    Ok(posts)
}

/// Fetch a published post by slug, with its tags.
///
/// Drafts are invisible here even when the slug matches.
pub async fn get_post_by_slug(slug: &str, deps: &ServerDeps) -> Result<PostWithTags, ActionError> {
    if let Some(cached) = deps.page_cache.post(slug).await {
        debug!(slug = %slug, "Post served from cache");
        return Ok(cached.as_ref().clone());
    }

    let ticket = deps.page_cache.ticket();
    let post = deps
        .store()
        .find_published_post_by_slug(slug)
        .await
        .map_err(|e| ActionError::store("Error fetching post", e))?
        .ok_or_else(|| ActionError::not_found("Post"))?;

    let post = with_tags(post, deps).await;
    deps.page_cache
        .store_post(slug, Arc::new(post.clone()), ticket)
        .await;

    Ok(post)
}

/// Fetch any post (draft or published) by id, with its tags. Admin only.
pub async fn get_post_by_id(id: PostId, deps: &ServerDeps) -> Result<PostWithTags, ActionError> {
    let post = deps
        .store()
        .find_post_by_id(id)
        .await
        .map_err(|e| ActionError::store("Error fetching post", e))?
        .ok_or_else(|| ActionError::not_found("Post"))?;

    Ok(with_tags(post, deps).await)
}

/// Attaches tags; a failed tag lookup degrades to an empty list.
async fn with_tags(post: Post, deps: &ServerDeps) -> PostWithTags {
    let tags = match deps.store().tags_for_post(post.id).await {
        Ok(tags) => tags,
        Err(e) => {
            error!(post_id = %post.id, error = %e, "Error fetching tags");
            Vec::new()
        }
    };
    PostWithTags { post, tags }
}

/// Create a post. Tag links are written after the post; a failed link
/// insert is logged and the post is kept.
pub async fn create_post(input: PostInput, deps: &ServerDeps) -> Result<Post, ActionError> {
    input.validate()?;

    let fields = input.to_fields();
    info!(slug = %fields.slug, published = fields.published, "Creating post");

    let post = deps
        .store()
        .insert_post(PostId::new(), &fields)
        .await
        .map_err(|e| ActionError::store("Failed to create post", e))?;

    if let Some(tag_ids) = input.tag_ids().filter(|ids| !ids.is_empty()) {
        if let Err(e) = link_post_tags(post.id, &tag_ids, deps).await {
            error!(post_id = %post.id, error = %e, "Error linking tags");
        }
    }

    deps.revalidate(&[BLOG_INDEX_PATH, &post_path(&post.slug)])
        .await;

    Ok(post)
}

/// Replace every writable column of a post.
///
/// When `tag_ids` is present the links are replaced wholesale; when absent
/// they are left as they are.
pub async fn update_post(
    id: PostId,
    input: PostInput,
    deps: &ServerDeps,
) -> Result<Post, ActionError> {
    input.validate()?;

    let previous = deps
        .store()
        .find_post_by_id(id)
        .await
        .map_err(|e| ActionError::store("Failed to update post", e))?
        .ok_or_else(|| ActionError::not_found("Post"))?;

    let fields = input.to_fields();
    info!(post_id = %id, slug = %fields.slug, "Updating post");

    let post = deps
        .store()
        .update_post(id, &fields)
        .await
        .map_err(|e| ActionError::store("Failed to update post", e))?
        .ok_or_else(|| ActionError::not_found("Post"))?;

    if let Some(tag_ids) = input.tag_ids() {
        if let Err(e) = sync_post_tags(id, &tag_ids, deps).await {
            error!(post_id = %id, error = %e, "Error updating tags");
        }
    }

    let new_path = post_path(&post.slug);
    let old_path = post_path(&previous.slug);
    if old_path == new_path {
        deps.revalidate(&[BLOG_INDEX_PATH, &new_path]).await;
    } else {
        deps.revalidate(&[BLOG_INDEX_PATH, &new_path, &old_path])
            .await;
    }

    Ok(post)
}

/// Delete a post. Deleting a missing post succeeds.
pub async fn delete_post(id: PostId, deps: &ServerDeps) -> Result<(), ActionError> {
    info!(post_id = %id, "Deleting post");

    let deleted = deps
        .store()
        .delete_post(id)
        .await
        .map_err(|e| ActionError::store("Failed to delete post", e))?;

    match deleted {
        Some(post) => {
            deps.revalidate(&[BLOG_INDEX_PATH, &post_path(&post.slug)])
                .await
        }
        None => deps.revalidate(&[BLOG_INDEX_PATH]).await,
    }

    Ok(())
}

pub async fn increment_view_count(post_id: PostId, deps: &ServerDeps) -> Result<(), ActionError> {
    deps.store()
        .increment_view_count(post_id)
        .await
        .map_err(|e| ActionError::store("Error incrementing view count", e))
}

/// Counts a page view without making the caller wait.
///
/// Failures are logged and otherwise dropped. The handle is only useful to
/// tests that want to observe the increment.
pub fn spawn_view_count_increment(post_id: PostId, deps: &ServerDeps) -> JoinHandle<()> {
    let store = deps.store.clone();
    tokio::spawn(async move {
        if let Err(e) = store.increment_view_count(post_id).await {
            warn!(post_id = %post_id, error = %e, "Error incrementing view count");
        }
    })
}

/// Search published posts by title, excerpt, or content.
pub async fn search_posts(input: SearchInput, deps: &ServerDeps) -> Result<Vec<Post>, ActionError> {
    let (query, page) = input.validate()?;

    deps.store()
        .search_published_posts(&query, page)
        .await
        .map_err(|e| ActionError::store("Error searching posts", e))
}
