use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::{CommentId, PostId};

/// Reader comment row. Content is immutable once stored; only `approved` changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Columns written when a comment is stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentFields {
    pub post_id: PostId,
    pub author_name: String,
    pub author_email: String,
    pub content: String,
    pub approved: bool,
}

/// Moderation state derived from the approved flag. Deleted comments are gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Pending,
    Approved,
}

impl std::fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommentStatus::Pending => write!(f, "pending"),
            CommentStatus::Approved => write!(f, "approved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentFilter {
    pub post_id: Option<PostId>,
    pub approved_only: bool,
}

impl CommentFilter {
    pub fn matches(&self, comment: &Comment) -> bool {
        self.post_id.map_or(true, |id| comment.post_id == id)
            && (!self.approved_only || comment.approved)
    }
}

impl Comment {
    pub fn status(&self) -> CommentStatus {
        if self.approved {
            CommentStatus::Approved
        } else {
            CommentStatus::Pending
        }
    }

    /// Newest first, optionally scoped to a post and/or approved comments
    pub async fn find_filtered(filter: &CommentFilter, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT * FROM comments
            WHERE ($1::uuid IS NULL OR post_id = $1)
              AND (NOT $2 OR approved = true)
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(filter.post_id)
        .bind(filter.approved_only)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn create(id: CommentId, fields: &CommentFields, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, author_name, author_email, content, approved)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.post_id)
        .bind(&fields.author_name)
        .bind(&fields.author_email)
        .bind(&fields.content)
        .bind(fields.approved)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Returns None if the comment does not exist
    pub async fn approve(id: CommentId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Comment>(
            "UPDATE comments SET approved = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn delete(id: CommentId, pool: &PgPool) -> Result<()> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn count_pending(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM comments WHERE approved = false")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
