use axum::extract::{Extension, Path};

use crate::domains::tag::actions;
use crate::domains::tag::{Tag, TagInput};
use crate::kernel::ServerDeps;
use crate::server::routes::extract::ApiJson;
use crate::server::routes::response::{parse_path_id, ApiResponse};

pub async fn list_tags_handler(Extension(deps): Extension<ServerDeps>) -> ApiResponse<Vec<Tag>> {
    actions::list_tags(&deps).await.into()
}

pub async fn create_tag_handler(
    Extension(deps): Extension<ServerDeps>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResponse<Tag> {
    ApiResponse::created(actions::create_tag(input, &deps).await)
}

pub async fn delete_tag_handler(
    Extension(deps): Extension<ServerDeps>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    let result = match parse_path_id(&id, "Tag") {
        Ok(id) => actions::delete_tag(id, &deps).await,
        Err(e) => Err(e),
    };
    result.into()
}
