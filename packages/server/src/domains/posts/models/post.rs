use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{Page, PostId};
use crate::domains::tag::models::Tag;

/// Blog post row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    pub content: String, // markdown
    pub excerpt: Option<String>,
    pub published: bool,
    pub view_count: i32,
    pub reading_time_minutes: Option<i32>,

    // SEO
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,

    // Featured image (public storage URL)
    pub featured_image: Option<String>,
    pub featured_image_alt: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A post with its tags attached, as shown on the detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostWithTags {
    #[serde(flatten)]
    pub post: Post,
    pub tags: Vec<Tag>,
}

/// Validated, writable post columns.
///
/// Used for both inserts and full updates; `view_count` and timestamps are
/// owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostFields {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub published: bool,
    pub reading_time_minutes: Option<i32>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
    pub featured_image: Option<String>,
    pub featured_image_alt: Option<String>,
}

/// Listing filter: a page window plus whether drafts are included
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostFilter {
    pub page: Page,
    pub include_unpublished: bool,
}

impl PostFilter {
    pub fn published(page: Page) -> Self {
        Self {
            page,
            include_unpublished: false,
        }
    }

    pub fn all(page: Page) -> Self {
        Self {
            page,
            include_unpublished: true,
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        self.include_unpublished || post.published
    }
}

/// Post counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostStats {
    pub total: i64,
    pub published: i64,
}

impl PostStats {
    pub fn drafts(&self) -> i64 {
        self.total - self.published
    }
}

// =============================================================================
// Queries
// =============================================================================

impl Post {
    /// Newest first, drafts filtered out unless the filter includes them
    pub async fn find_paginated(filter: &PostFilter, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE ($3 OR published = true)
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(filter.page.limit)
        .bind(filter.page.offset)
        .bind(filter.include_unpublished)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Only published posts are reachable by slug
    pub async fn find_published_by_slug(slug: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE slug = $1 AND published = true")
            .bind(slug)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_id(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(id: PostId, fields: &PostFields, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (
                id, slug, title, content, excerpt, published, reading_time_minutes,
                meta_title, meta_description, og_image, featured_image, featured_image_alt
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.slug)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.published)
        .bind(fields.reading_time_minutes)
        .bind(&fields.meta_title)
        .bind(&fields.meta_description)
        .bind(&fields.og_image)
        .bind(&fields.featured_image)
        .bind(&fields.featured_image_alt)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Overwrites every writable column. Returns None if the post does not exist.
    pub async fn update(id: PostId, fields: &PostFields, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts SET
                slug = $2,
                title = $3,
                content = $4,
                excerpt = $5,
                published = $6,
                reading_time_minutes = $7,
                meta_title = $8,
                meta_description = $9,
                og_image = $10,
                featured_image = $11,
                featured_image_alt = $12,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&fields.slug)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.excerpt)
        .bind(fields.published)
        .bind(fields.reading_time_minutes)
        .bind(&fields.meta_title)
        .bind(&fields.meta_description)
        .bind(&fields.og_image)
        .bind(&fields.featured_image)
        .bind(&fields.featured_image_alt)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Deletes the post; links and comments go with it via FK cascade.
    pub async fn delete(id: PostId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Post>("DELETE FROM posts WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Calls the `increment_view_count` database function
    pub async fn increment_view_count(id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query("SELECT increment_view_count($1)")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Case-insensitive substring search over title, excerpt and content of published posts
    pub async fn search_published(query: &str, page: Page, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE published = true
              AND (title ILIKE $1 OR excerpt ILIKE $1 OR content ILIKE $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(like_pattern(query))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn stats(pool: &PgPool) -> Result<PostStats> {
        sqlx::query_as::<_, PostStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE published) AS published
            FROM posts
            "#,
        )
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// In-process equivalent of the search predicate
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self
                .excerpt
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(&needle))
            || self.content.to_lowercase().contains(&needle)
    }
}

/// Wraps a user query in `%...%`, escaping LIKE metacharacters
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
