//! Application setup and server configuration.

use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::domains::media::MAX_IMAGE_BYTES;
use crate::kernel::ServerDeps;
use crate::server::middleware::{jwt_auth_middleware, require_admin};
use crate::server::routes::{
    admin_get_post_handler, admin_list_comments_handler, admin_list_posts_handler,
    approve_comment_handler, create_post_handler, create_tag_handler, dashboard_handler,
    delete_comment_handler, delete_post_handler, delete_tag_handler, get_post_handler,
    health_handler, list_comments_handler, list_posts_handler, list_tags_handler,
    search_posts_handler, submit_comment_handler, update_post_handler, upload_image_handler,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Multipart framing on top of the largest accepted image
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 1024 * 1024;

/// Admin API, mounted under `/api/admin`
fn admin_routes() -> Router {
    Router::new()
        .route("/dashboard", get(dashboard_handler))
        .route(
            "/posts",
            get(admin_list_posts_handler).post(create_post_handler),
        )
        .route(
            "/posts/:id",
            get(admin_get_post_handler)
                .put(update_post_handler)
                .delete(delete_post_handler),
        )
        .route("/tags", post(create_tag_handler))
        .route("/tags/:id", delete(delete_tag_handler))
        .route("/comments", get(admin_list_comments_handler))
        .route("/comments/:id", delete(delete_comment_handler))
        .route("/comments/:id/approve", post(approve_comment_handler))
        .route(
            "/images",
            post(upload_image_handler).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route_layer(middleware::from_fn(require_admin))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, allowed_origins: &[String]) -> Router {
    // Clone deps for middleware closure
    let deps_for_auth = deps.clone();

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/posts", get(list_posts_handler))
        .route("/api/posts/search", get(search_posts_handler))
        .route("/api/posts/:slug", get(get_post_handler))
        .route("/api/tags", get(list_tags_handler))
        .route(
            "/api/comments",
            get(list_comments_handler).post(submit_comment_handler),
        )
        .nest("/api/admin", admin_routes())
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(deps_for_auth.clone(), req, next)
        }))
        .layer(Extension(deps))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
