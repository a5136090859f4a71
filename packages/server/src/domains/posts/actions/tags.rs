//! Post tag links.
//!
//! The join table is rewritten rather than diffed: every link for the post is
//! deleted, then the new set is inserted. The two statements are not atomic;
//! a failure in between leaves the post with no tags.

use anyhow::Result;
use tracing::debug;

use crate::common::{PostId, TagId};
use crate::kernel::ServerDeps;

/// Insert links for a post. An empty set is a no-op.
pub async fn link_post_tags(post_id: PostId, tag_ids: &[TagId], deps: &ServerDeps) -> Result<()> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    debug!(post_id = %post_id, tag_count = tag_ids.len(), "Linking tags");
    deps.store().link_post_tags(post_id, tag_ids).await
}

/// Replace all links for a post with `tag_ids`.
pub async fn sync_post_tags(post_id: PostId, tag_ids: &[TagId], deps: &ServerDeps) -> Result<()> {
    deps.store().clear_post_tags(post_id).await?;
    link_post_tags(post_id, tag_ids, deps).await
}
