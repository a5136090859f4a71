//! Postgres-backed blog store.
//!
//! Thin adapter from [`BaseBlogStore`] onto the model query functions; each
//! method is one statement against the pool.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{CommentId, Page, PostId, TagId};
use crate::domains::comments::models::{Comment, CommentFields, CommentFilter};
use crate::domains::posts::models::{Post, PostFields, PostFilter, PostStats};
use crate::domains::tag::models::{PostTag, Tag, TagFields};
use crate::kernel::BaseBlogStore;

#[derive(Clone)]
pub struct PostgresBlogStore {
    pool: PgPool,
}

impl PostgresBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl BaseBlogStore for PostgresBlogStore {
    async fn list_posts(&self, filter: PostFilter) -> Result<Vec<Post>> {
        Post::find_paginated(&filter, &self.pool).await
    }

    async fn find_published_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        Post::find_published_by_slug(slug, &self.pool).await
    }

    async fn find_post_by_id(&self, id: PostId) -> Result<Option<Post>> {
        Post::find_by_id(id, &self.pool).await
    }

    async fn insert_post(&self, id: PostId, fields: &PostFields) -> Result<Post> {
        Post::create(id, fields, &self.pool).await
    }

    async fn update_post(&self, id: PostId, fields: &PostFields) -> Result<Option<Post>> {
        Post::update(id, fields, &self.pool).await
    }

    async fn delete_post(&self, id: PostId) -> Result<Option<Post>> {
        Post::delete(id, &self.pool).await
    }

    async fn increment_view_count(&self, id: PostId) -> Result<()> {
        Post::increment_view_count(id, &self.pool).await
    }

    async fn search_published_posts(&self, query: &str, page: Page) -> Result<Vec<Post>> {
        Post::search_published(query, page, &self.pool).await
    }

    async fn post_stats(&self) -> Result<PostStats> {
        Post::stats(&self.pool).await
    }

    async fn tags_for_post(&self, post_id: PostId) -> Result<Vec<Tag>> {
        Tag::find_for_post(post_id, &self.pool).await
    }

    async fn clear_post_tags(&self, post_id: PostId) -> Result<()> {
        PostTag::delete_for_post(post_id, &self.pool).await
    }

    async fn link_post_tags(&self, post_id: PostId, tag_ids: &[TagId]) -> Result<()> {
        PostTag::link_many(post_id, tag_ids, &self.pool).await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>> {
        Tag::find_all(&self.pool).await
    }

    async fn insert_tag(&self, id: TagId, fields: &TagFields) -> Result<Tag> {
        Tag::create(id, fields, &self.pool).await
    }

    async fn delete_tag(&self, id: TagId) -> Result<()> {
        Tag::delete(id, &self.pool).await
    }

    async fn count_tags(&self) -> Result<i64> {
        Tag::count(&self.pool).await
    }

    async fn list_comments(&self, filter: CommentFilter) -> Result<Vec<Comment>> {
        Comment::find_filtered(&filter, &self.pool).await
    }

    async fn insert_comment(&self, id: CommentId, fields: &CommentFields) -> Result<Comment> {
        Comment::create(id, fields, &self.pool).await
    }

    async fn approve_comment(&self, id: CommentId) -> Result<Option<Comment>> {
        Comment::approve(id, &self.pool).await
    }

    async fn delete_comment(&self, id: CommentId) -> Result<()> {
        Comment::delete(id, &self.pool).await
    }

    async fn count_pending_comments(&self) -> Result<i64> {
        Comment::count_pending(&self.pool).await
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
