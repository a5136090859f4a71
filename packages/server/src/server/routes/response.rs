//! Maps action results onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::common::{ActionError, ActionResult, AuthError, ErrorPayload, Id};

/// An action result plus the status to send on success.
///
/// The body is always the uniform `{success, data?, error?}` shape.
pub struct ApiResponse<T> {
    success_status: StatusCode,
    result: Result<T, ActionError>,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: Result<T, ActionError>) -> Self {
        Self {
            success_status: StatusCode::OK,
            result,
        }
    }

    pub fn created(result: Result<T, ActionError>) -> Self {
        Self {
            success_status: StatusCode::CREATED,
            result,
        }
    }
}

impl<T> From<Result<T, ActionError>> for ApiResponse<T> {
    fn from(result: Result<T, ActionError>) -> Self {
        Self::ok(result)
    }
}

pub fn error_status(err: &ActionError) -> StatusCode {
    match err {
        ActionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ActionError::NotFound(_) => StatusCode::NOT_FOUND,
        ActionError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = match &self.result {
            Ok(_) => self.success_status,
            Err(err) => error_status(err),
        };
        (status, Json(ActionResult::from(self.result))).into_response()
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::AdminRequired => StatusCode::FORBIDDEN,
            AuthError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
        };
        let body: ActionResult<()> = ActionResult::err(ErrorPayload::Message(self.to_string()));
        (status, Json(body)).into_response()
    }
}

/// Parses an id from a path segment. A malformed id cannot name a row, so
/// it is reported the same way as a missing one.
pub fn parse_path_id<T>(raw: &str, what: &str) -> Result<Id<T>, ActionError> {
    Id::parse(raw).map_err(|_| ActionError::not_found(what))
}
