// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no validation or business rules.
// Actions in domains/* validate input and decide what to call; these traits
// are the remote collaborators they call.
//
// Naming convention: Base* for trait names (e.g., BaseBlogStore, BaseImageStorage)

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::common::{CommentId, Page, PostId, TagId};
use crate::domains::comments::models::{Comment, CommentFields, CommentFilter};
use crate::domains::posts::models::{Post, PostFields, PostFilter, PostStats};
use crate::domains::tag::models::{Tag, TagFields};

// =============================================================================
// Blog Store Trait (Infrastructure - remote relational store)
// =============================================================================

/// Row-level access to posts, tags, post/tag links and comments.
///
/// Every call is a single remote round trip. Nothing here is transactional:
/// callers that chain calls (tag sync) accept partial failure.
#[async_trait]
pub trait BaseBlogStore: Send + Sync {
    // Posts
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>>;
    async fn find_published_post_by_slug(&self, slug: &str) -> Result<Option<Post>>;
    async fn find_post_by_id(&self, id: PostId) -> Result<Option<Post>>;
    async fn insert_post(&self, id: PostId, fields: &PostFields) -> Result<Post>;
    /// Returns None if no post has this id
    async fn update_post(&self, id: PostId, fields: &PostFields) -> Result<Option<Post>>;
    /// Returns the deleted row, None if it did not exist
    async fn delete_post(&self, id: PostId) -> Result<Option<Post>>;
    /// Remote procedure `increment_view_count(post_id)`
    async fn increment_view_count(&self, id: PostId) -> Result<()>;
    async fn search_published_posts(&self, query: &str, page: Page) -> Result<Vec<Post>>;
    async fn post_stats(&self) -> Result<PostStats>;

    // Post/tag links
    async fn tags_for_post(&self, post_id: PostId) -> Result<Vec<Tag>>;
    async fn clear_post_tags(&self, post_id: PostId) -> Result<()>;
    async fn link_post_tags(&self, post_id: PostId, tag_ids: &[TagId]) -> Result<()>;

    // Tags
    async fn list_tags(&self) -> Result<Vec<Tag>>;
    async fn insert_tag(&self, id: TagId, fields: &TagFields) -> Result<Tag>;
    async fn delete_tag(&self, id: TagId) -> Result<()>;
    async fn count_tags(&self) -> Result<i64>;

    // Comments
    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>>;
    async fn insert_comment(&self, id: CommentId, fields: &CommentFields) -> Result<Comment>;
    /// Returns None if no comment has this id
    async fn approve_comment(&self, id: CommentId) -> Result<Option<Comment>>;
    async fn delete_comment(&self, id: CommentId) -> Result<()>;
    async fn count_pending_comments(&self) -> Result<i64>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Image Storage Trait (Infrastructure - object storage bucket)
// =============================================================================

#[async_trait]
pub trait BaseImageStorage: Send + Sync {
    /// Upload an object; fails if `path` already exists. Returns the stored path.
    async fn upload(&self, path: &str, content_type: &str, body: Bytes) -> Result<String>;

    /// Public-read URL for a stored path
    fn public_url(&self, path: &str) -> String;
}
