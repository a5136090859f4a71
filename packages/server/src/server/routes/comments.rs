use axum::extract::{Extension, Path};

use crate::domains::comments::actions;
use crate::domains::comments::{Comment, CommentInput, CommentListQuery};
use crate::kernel::ServerDeps;
use crate::server::routes::extract::{ApiJson, ApiQuery};
use crate::server::routes::response::{parse_path_id, ApiResponse};

/// Public listing. Only approved comments, whatever the query asks for.
pub async fn list_comments_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiQuery(mut query): ApiQuery<CommentListQuery>,
) -> ApiResponse<Vec<Comment>> {
    query.approved_only = Some(true);
    actions::list_comments(query, true, &deps).await.into()
}

pub async fn submit_comment_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiJson(input): ApiJson<CommentInput>,
) -> ApiResponse<Comment> {
    ApiResponse::created(actions::submit_comment(input, &deps).await)
}

/// Moderation queue; includes pending comments unless `approved_only=true`.
pub async fn admin_list_comments_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiQuery(query): ApiQuery<CommentListQuery>,
) -> ApiResponse<Vec<Comment>> {
    actions::list_comments(query, false, &deps).await.into()
}

pub async fn approve_comment_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResponse<Comment> {
    let result = match parse_path_id(&id, "Comment") {
        Ok(id) => actions::approve_comment(id, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}

pub async fn delete_comment_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    let result = match parse_path_id(&id, "Comment") {
        Ok(id) => actions::delete_comment(id, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}
