//! Request extractors whose rejections keep the `{success, error}` body.
//!
//! axum's own `Json` and `Query` reject malformed input with a plain-text
//! response. These wrappers report the same failures as a validation error
//! on `body` or `params`.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::common::ActionError;
use crate::server::routes::response::ApiResponse;

pub const BODY_FIELD: &str = "body";
pub const PARAMS_FIELD: &str = "params";

/// JSON request body
pub struct ApiJson<T>(pub T);

/// Query string
pub struct ApiQuery<T>(pub T);

fn rejected(field: &str, message: String) -> ApiResponse<()> {
    debug!(field = field, error = %message, "Rejected malformed request");
    ApiResponse::ok(Err(ActionError::field(field, message)))
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiResponse<()>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(BODY_FIELD, rejection.body_text())),
        }
    }
}

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiResponse<()>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(rejected(PARAMS_FIELD, rejection.body_text())),
        }
    }
}
