use serde::Serialize;
use tracing::debug;

use crate::common::{ActionError, Page};
use crate::domains::posts::models::{Post, PostFilter};
use crate::kernel::ServerDeps;

pub const RECENT_POSTS: i64 = 5;

/// Counts and recent activity shown on the admin landing page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub total_posts: i64,
    pub published_posts: i64,
    pub draft_posts: i64,
    pub total_tags: i64,
    pub pending_comments: i64,
    pub recent_posts: Vec<Post>,
}

pub async fn dashboard(deps: &ServerDeps) -> Result<Dashboard, ActionError> {
    let store = deps.store();
    let load_failed = |e: anyhow::Error| ActionError::store("Error loading dashboard", e);

    let stats = store.post_stats().await.map_err(load_failed)?;
    let total_tags = store.count_tags().await.map_err(load_failed)?;
    let pending_comments = store.count_pending_comments().await.map_err(load_failed)?;
    let recent_posts = store
        .list_posts(PostFilter::all(Page::new(RECENT_POSTS, 0)))
        .await
        .map_err(load_failed)?;

    debug!(
        total = stats.total,
        pending_comments = pending_comments,
        "Dashboard loaded"
    );

    Ok(Dashboard {
        total_posts: stats.total,
        published_posts: stats.published,
        draft_posts: stats.drafts(),
        total_tags,
        pending_comments,
        recent_posts,
    })
}
