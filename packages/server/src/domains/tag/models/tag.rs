use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{PostId, TagId};

/// Tag row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Validated, writable tag columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFields {
    pub name: String,
    pub slug: String,
}

/// Join row linking a post to a tag. Has no identity of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostTag {
    pub post_id: PostId,
    pub tag_id: TagId,
}

// =============================================================================
// Tag Queries
// =============================================================================

impl Tag {
    /// All tags, alphabetical
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags ORDER BY name ASC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn create(id: TagId, fields: &TagFields, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (id, name, slug) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.slug)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Deleting a tag drops its post links (FK cascade); posts are untouched.
    pub async fn delete(id: TagId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Tags linked to a post
    pub async fn find_for_post(post_id: PostId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.*
            FROM tags t
            INNER JOIN post_tags pt ON pt.tag_id = t.id
            WHERE pt.post_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tags")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// PostTag Queries
// =============================================================================

impl PostTag {
    /// Remove every tag link for a post
    pub async fn delete_for_post(post_id: PostId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Bulk insert links in one statement; fails as a whole if any tag id is unknown
    pub async fn link_many(post_id: PostId, tag_ids: &[TagId], pool: &PgPool) -> Result<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO post_tags (post_id, tag_id)
            SELECT $1, UNNEST($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(tag_ids)
        .execute(pool)
        .await?;
        Ok(())
    }
}
