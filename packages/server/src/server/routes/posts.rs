use axum::extract::{Extension, Path};
use serde::Serialize;

use crate::common::{ActionError, PostId};
use crate::domains::posts::actions;
use crate::domains::posts::{ListPostsQuery, Post, PostInput, PostMetadata, PostWithTags, SearchInput};
use crate::kernel::ServerDeps;
use crate::server::routes::extract::{ApiJson, ApiQuery};
use crate::server::routes::response::{parse_path_id, ApiResponse};

/// Detail page payload: the post, its tags, and page metadata
#[derive(Debug, Serialize)]
pub struct PostPage {
    #[serde(flatten)]
    pub post: PostWithTags,
    pub metadata: PostMetadata,
}

fn post_id(raw: &str) -> Result<PostId, ActionError> {
    parse_path_id(raw, "Post")
}

// =============================================================================
// Public
// =============================================================================

pub async fn list_posts_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> ApiResponse<Vec<Post>> {
    actions::list_posts(query.page_args(), false, &deps).await.into()
}

pub async fn search_posts_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiQuery(input): ApiQuery<SearchInput>,
) -> ApiResponse<Vec<Post>> {
    actions::search_posts(input, &deps).await.into()
}

/// Published post by slug. Counts a view without waiting on it.
pub async fn get_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(slug): Path<String>,
) -> ApiResponse<PostPage> {
    let result = actions::get_post_by_slug(&slug, &deps).await.map(|post| {
        actions::spawn_view_count_increment(post.post.id, &deps);
        let metadata = PostMetadata::for_post(&post.post);
        PostPage { post, metadata }
    });
    result.into()
}

// =============================================================================
// Admin
// =============================================================================

pub async fn admin_list_posts_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiQuery(query): ApiQuery<ListPostsQuery>,
) -> ApiResponse<Vec<Post>> {
    actions::list_posts(query.page_args(), true, &deps).await.into()
}

pub async fn admin_get_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResponse<PostWithTags> {
    let result = match post_id(&id) {
        Ok(id) => actions::get_post_by_id(id, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}

pub async fn create_post_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiJson(input): ApiJson<PostInput>,
) -> ApiResponse<Post> {
    ApiResponse::created(actions::create_post(input, &deps).await)
}

pub async fn update_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PostInput>,
) -> ApiResponse<Post> {
    let result = match post_id(&id) {
        Ok(id) => actions::update_post(id, input, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}

pub async fn delete_post_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    let result = match post_id(&id) {
        Ok(id) => actions::delete_post(id, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}
