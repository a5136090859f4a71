use axum::extract::Extension;

use crate::domains::admin::{dashboard, Dashboard};
use crate::kernel::ServerDeps;
use crate::server::routes::response::ApiResponse;

pub async fn dashboard_handler(Extension(deps): Extension<ServerDeps>) -> ApiResponse<Dashboard> {
    dashboard(&deps).await.into()
}
