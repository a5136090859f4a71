//! Comment actions - public submission and admin moderation
//!
//! A comment is pending until an admin approves it; the only other
//! transition is deletion.

use tracing::info;
use validator::Validate;

use crate::common::{ActionError, CommentId};
use crate::domains::comments::data::{CommentInput, CommentListQuery};
use crate::domains::comments::models::Comment;
use crate::kernel::{ServerDeps, ADMIN_COMMENTS_PATH};

/// List comments, newest first.
///
/// `default_approved_only` applies when the query does not say; public
/// callers pass `true`.
pub async fn list_comments(
    query: CommentListQuery,
    default_approved_only: bool,
    deps: &ServerDeps,
) -> Result<Vec<Comment>, ActionError> {
    let filter = query.into_filter(default_approved_only)?;

    deps.store()
        .list_comments(filter)
        .await
        .map_err(|e| ActionError::store("Error fetching comments", e))
}

/// Submit a reader comment. Stored unapproved regardless of input.
pub async fn submit_comment(input: CommentInput, deps: &ServerDeps) -> Result<Comment, ActionError> {
    input.validate()?;
    let fields = input.to_fields()?;

    info!(post_id = %fields.post_id, "Submitting comment");

    deps.store()
        .insert_comment(CommentId::new(), &fields)
        .await
        .map_err(|e| ActionError::store("Failed to submit comment", e))
}

pub async fn approve_comment(id: CommentId, deps: &ServerDeps) -> Result<Comment, ActionError> {
    let comment = deps
        .store()
        .approve_comment(id)
        .await
        .map_err(|e| ActionError::store("Failed to approve comment", e))?
        .ok_or_else(|| ActionError::not_found("Comment"))?;

    info!(comment_id = %id, status = %comment.status(), "Comment moderated");

    deps.revalidate(&[ADMIN_COMMENTS_PATH]).await;
    Ok(comment)
}

/// Delete a comment. Deleting a missing comment succeeds.
pub async fn delete_comment(id: CommentId, deps: &ServerDeps) -> Result<(), ActionError> {
    info!(comment_id = %id, "Deleting comment");

    deps.store()
        .delete_comment(id)
        .await
        .map_err(|e| ActionError::store("Failed to delete comment", e))?;

    deps.revalidate(&[ADMIN_COMMENTS_PATH]).await;
    Ok(())
}
