// TestDependencies - in-memory implementations for testing
//
// Provides an in-memory blog store and a recording image storage that can be
// injected into ServerDeps. The store mirrors the database constraints the
// actions rely on: unique slugs, foreign keys, and cascading deletes.

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

use super::{BaseBlogStore, BaseImageStorage, PageCache, ServerDeps};
use crate::common::{CommentId, Page, PostId, TagId};
use crate::domains::auth::JwtService;
use crate::domains::comments::models::{Comment, CommentFields, CommentFilter};
use crate::domains::posts::models::{Post, PostFields, PostFilter, PostStats};
use crate::domains::tag::models::{PostTag, Tag, TagFields};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_JWT_ISSUER: &str = "test-issuer";
pub const TEST_ADMIN_EMAIL: &str = "admin@example.com";

// =============================================================================
// In-memory Blog Store
// =============================================================================

#[derive(Default)]
struct StoreState {
    posts: Vec<Post>,
    tags: Vec<Tag>,
    post_tags: Vec<PostTag>,
    comments: Vec<Comment>,
    failing: HashSet<&'static str>,
}

/// Parks one store read after it has read its rows, until released
#[derive(Default)]
pub struct ReadHold {
    reached: Notify,
    release: Notify,
}

impl ReadHold {
    /// Resolves once the held read has its result in hand
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Default)]
pub struct InMemoryBlogStore {
    state: Mutex<StoreState>,
    hold: Mutex<Option<(&'static str, Arc<ReadHold>)>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every later call of the named operation fail (e.g. "link_post_tags")
    pub fn fail_on(&self, operation: &'static str) {
        self.state().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state().failing.remove(operation);
    }

    /// Raw join rows for a post
    pub fn links_for_post(&self, post_id: PostId) -> Vec<PostTag> {
        self.state()
            .post_tags
            .iter()
            .filter(|pt| pt.post_id == post_id)
            .copied()
            .collect()
    }

    /// Raw comment rows, regardless of approval
    pub fn all_comments(&self) -> Vec<Comment> {
        self.state().comments.clone()
    }

    pub fn post(&self, id: PostId) -> Option<Post> {
        self.state().posts.iter().find(|p| p.id == id).cloned()
    }

    /// Hold the next call of a read ("list_posts" or
    /// "find_published_post_by_slug") after it has read, until released.
    pub fn hold_next(&self, operation: &'static str) -> Arc<ReadHold> {
        let hold = Arc::new(ReadHold::default());
        *self.hold.lock().unwrap_or_else(|e| e.into_inner()) = Some((operation, hold.clone()));
        hold
    }

    async fn pause_if_held(&self, operation: &'static str) {
        let hold = {
            let mut slot = self.hold.lock().unwrap_or_else(|e| e.into_inner());
            match slot.take() {
                Some((held, hold)) if held == operation => Some(hold),
                other => {
                    *slot = other;
                    None
                }
            }
        };
        if let Some(hold) = hold {
            hold.reached.notify_one();
            hold.release.notified().await;
        }
    }
}

impl StoreState {
    fn check(&self, operation: &'static str) -> Result<()> {
        if self.failing.contains(operation) {
            anyhow::bail!("simulated store failure in {}", operation);
        }
        Ok(())
    }

    fn newest_first<T, K: Ord>(items: &mut [T], key: impl Fn(&T) -> K) {
        items.sort_by(|a, b| key(b).cmp(&key(a)));
    }
}

fn window<T: Clone>(items: &[T], page: Page) -> Vec<T> {
    items
        .iter()
        .skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .cloned()
        .collect()
}

fn post_from_fields(id: PostId, fields: &PostFields) -> Post {
    let now = Utc::now();
    Post {
        id,
        slug: fields.slug.clone(),
        title: fields.title.clone(),
        content: fields.content.clone(),
        excerpt: fields.excerpt.clone(),
        published: fields.published,
        view_count: 0,
        reading_time_minutes: fields.reading_time_minutes,
        meta_title: fields.meta_title.clone(),
        meta_description: fields.meta_description.clone(),
        og_image: fields.og_image.clone(),
        featured_image: fields.featured_image.clone(),
        featured_image_alt: fields.featured_image_alt.clone(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl BaseBlogStore for InMemoryBlogStore {
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        let posts = {
            let state = self.state();
            state.check("list_posts")?;
            let mut posts: Vec<Post> = state
                .posts
                .iter()
                .filter(|p| filter.matches(p))
                .cloned()
                .collect();
            StoreState::newest_first(&mut posts, |p| (p.created_at, p.id));
            window(&posts, filter.page)
        };
        self.pause_if_held("list_posts").await;
        Ok(posts)
    }

    async fn find_published_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let post = {
            let state = self.state();
            state.check("find_published_post_by_slug")?;
            state
                .posts
                .iter()
                .find(|p| p.slug == slug && p.published)
                .cloned()
        };
        self.pause_if_held("find_published_post_by_slug").await;
        Ok(post)
    }

    async fn find_post_by_id(&self, id: PostId) -> Result<Option<Post>> {
        let state = self.state();
        state.check("find_post_by_id")?;
        Ok(state.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(&self, id: PostId, fields: &PostFields) -> Result<Post> {
        let mut state = self.state();
        state.check("insert_post")?;
        if state.posts.iter().any(|p| p.slug == fields.slug) {
            anyhow::bail!("duplicate key value violates unique constraint \"posts_slug_key\"");
        }
        let post = post_from_fields(id, fields);
        state.posts.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, id: PostId, fields: &PostFields) -> Result<Option<Post>> {
        let mut state = self.state();
        state.check("update_post")?;
        if state
            .posts
            .iter()
            .any(|p| p.slug == fields.slug && p.id != id)
        {
            anyhow::bail!("duplicate key value violates unique constraint \"posts_slug_key\"");
        }
        let Some(existing) = state.posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let mut updated = post_from_fields(id, fields);
        updated.view_count = existing.view_count;
        updated.created_at = existing.created_at;
        *existing = updated.clone();
        Ok(Some(updated))
    }

    async fn delete_post(&self, id: PostId) -> Result<Option<Post>> {
        let mut state = self.state();
        state.check("delete_post")?;
        let Some(index) = state.posts.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let removed = state.posts.remove(index);
        state.post_tags.retain(|pt| pt.post_id != id);
        state.comments.retain(|c| c.post_id != id);
        Ok(Some(removed))
    }

    async fn increment_view_count(&self, id: PostId) -> Result<()> {
        let mut state = self.state();
        state.check("increment_view_count")?;
        if let Some(post) = state.posts.iter_mut().find(|p| p.id == id) {
            post.view_count += 1;
        }
        Ok(())
    }

    async fn search_published_posts(&self, query: &str, page: Page) -> Result<Vec<Post>> {
        let state = self.state();
        state.check("search_published_posts")?;
        let mut posts: Vec<Post> = state
            .posts
            .iter()
            .filter(|p| p.published && p.matches_query(query))
            .cloned()
            .collect();
        StoreState::newest_first(&mut posts, |p| (p.created_at, p.id));
        Ok(window(&posts, page))
    }

    async fn post_stats(&self) -> Result<PostStats> {
        let state = self.state();
        state.check("post_stats")?;
        Ok(PostStats {
            total: state.posts.len() as i64,
            published: state.posts.iter().filter(|p| p.published).count() as i64,
        })
    }

    async fn tags_for_post(&self, post_id: PostId) -> Result<Vec<Tag>> {
        let state = self.state();
        state.check("tags_for_post")?;
        let mut tags: Vec<Tag> = state
            .post_tags
            .iter()
            .filter(|pt| pt.post_id == post_id)
            .filter_map(|pt| state.tags.iter().find(|t| t.id == pt.tag_id).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn clear_post_tags(&self, post_id: PostId) -> Result<()> {
        let mut state = self.state();
        state.check("clear_post_tags")?;
        state.post_tags.retain(|pt| pt.post_id != post_id);
        Ok(())
    }

    async fn link_post_tags(&self, post_id: PostId, tag_ids: &[TagId]) -> Result<()> {
        let mut state = self.state();
        state.check("link_post_tags")?;
        if !state.posts.iter().any(|p| p.id == post_id) {
            anyhow::bail!("insert or update on table \"post_tags\" violates foreign key constraint \"post_tags_post_id_fkey\"");
        }
        if let Some(missing) = tag_ids
            .iter()
            .find(|id| !state.tags.iter().any(|t| t.id == **id))
        {
            anyhow::bail!(
                "insert or update on table \"post_tags\" violates foreign key constraint \"post_tags_tag_id_fkey\" (tag {})",
                missing
            );
        }
        for tag_id in tag_ids {
            let link = PostTag {
                post_id,
                tag_id: *tag_id,
            };
            if !state.post_tags.contains(&link) {
                state.post_tags.push(link);
            }
        }
        Ok(())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let state = self.state();
        state.check("list_tags")?;
        let mut tags = state.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn insert_tag(&self, id: TagId, fields: &TagFields) -> Result<Tag> {
        let mut state = self.state();
        state.check("insert_tag")?;
        if state.tags.iter().any(|t| t.slug == fields.slug) {
            anyhow::bail!("duplicate key value violates unique constraint \"tags_slug_key\"");
        }
        let tag = Tag {
            id,
            name: fields.name.clone(),
            slug: fields.slug.clone(),
            created_at: Utc::now(),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn delete_tag(&self, id: TagId) -> Result<()> {
        let mut state = self.state();
        state.check("delete_tag")?;
        state.tags.retain(|t| t.id != id);
        state.post_tags.retain(|pt| pt.tag_id != id);
        Ok(())
    }

    async fn count_tags(&self) -> Result<i64> {
        let state = self.state();
        state.check("count_tags")?;
        Ok(state.tags.len() as i64)
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        let state = self.state();
        state.check("list_comments")?;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        StoreState::newest_first(&mut comments, |c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn insert_comment(&self, id: CommentId, fields: &CommentFields) -> Result<Comment> {
        let mut state = self.state();
        state.check("insert_comment")?;
        if !state.posts.iter().any(|p| p.id == fields.post_id) {
            anyhow::bail!("insert or update on table \"comments\" violates foreign key constraint \"comments_post_id_fkey\"");
        }
        let comment = Comment {
            id,
            post_id: fields.post_id,
            author_name: fields.author_name.clone(),
            author_email: fields.author_email.clone(),
            content: fields.content.clone(),
            approved: fields.approved,
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(comment)
    }

    async fn approve_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        let mut state = self.state();
        state.check("approve_comment")?;
        Ok(state.comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.approved = true;
            c.clone()
        }))
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        let mut state = self.state();
        state.check("delete_comment")?;
        state.comments.retain(|c| c.id != id);
        Ok(())
    }

    async fn count_pending_comments(&self) -> Result<i64> {
        let state = self.state();
        state.check("count_pending_comments")?;
        Ok(state.comments.iter().filter(|c| !c.approved).count() as i64)
    }

    async fn ping(&self) -> Result<()> {
        self.state().check("ping")
    }
}

// =============================================================================
// Mock Image Storage
// =============================================================================

/// Arguments captured from an upload call
#[derive(Debug, Clone)]
pub struct UploadCall {
    pub path: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
pub struct MockImageStorage {
    uploads: Mutex<Vec<UploadCall>>,
    fail: Mutex<bool>,
}

impl MockImageStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let storage = Self::default();
        *storage.fail.lock().unwrap_or_else(|e| e.into_inner()) = true;
        storage
    }

    /// All uploads received so far
    pub fn uploads(&self) -> Vec<UploadCall> {
        self.uploads
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl BaseImageStorage for MockImageStorage {
    async fn upload(&self, path: &str, content_type: &str, body: Bytes) -> Result<String> {
        if *self.fail.lock().unwrap_or_else(|e| e.into_inner()) {
            anyhow::bail!("Upload failed: simulated storage outage");
        }
        let mut uploads = self.uploads.lock().unwrap_or_else(|e| e.into_inner());
        if uploads.iter().any(|u| u.path == path) {
            anyhow::bail!("Upload failed: The resource already exists");
        }
        uploads.push(UploadCall {
            path: path.to_string(),
            content_type: content_type.to_string(),
            size: body.len(),
        });
        Ok(path.to_string())
    }

    fn public_url(&self, path: &str) -> String {
        format!("https://storage.test/storage/v1/object/public/blog-images/{}", path)
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<InMemoryBlogStore>,
    pub storage: Arc<MockImageStorage>,
    pub admin_emails: Vec<String>,
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryBlogStore::new()),
            storage: Arc::new(MockImageStorage::new()),
            admin_emails: vec![TEST_ADMIN_EMAIL.to_string()],
        }
    }

    /// Set a mock image storage
    pub fn mock_storage(mut self, storage: MockImageStorage) -> Self {
        self.storage = Arc::new(storage);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self) -> ServerDeps {
        ServerDeps::new(
            self.store,
            self.storage,
            PageCache::new(Duration::from_secs(30)),
            Arc::new(JwtService::new(TEST_JWT_SECRET, TEST_JWT_ISSUER.to_string())),
            self.admin_emails,
        )
    }
}
