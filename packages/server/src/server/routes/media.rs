use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Extension, Multipart};
use axum::http::StatusCode;
use tracing::warn;

use crate::common::ActionError;
use crate::domains::media::{upload_image, ImageUpload, UploadedImage};
use crate::kernel::ServerDeps;
use crate::server::routes::response::ApiResponse;

const FILE_FIELD: &str = "file";

/// Multipart image upload; the image travels in the `file` field.
pub async fn upload_image_handler(
    Extension(deps): Extension<ServerDeps>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResponse<UploadedImage> {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Upload is not multipart");
            return ApiResponse::created(Err(ActionError::field(
                FILE_FIELD,
                "No file provided",
            )));
        }
    };
    let result = match read_upload(multipart).await {
        Ok(upload) => upload_image(upload, &deps).await,
        Err(e) => Err(e),
    };
    ApiResponse::created(result)
}

async fn read_upload(mut multipart: Multipart) -> Result<ImageUpload, ActionError> {
    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let body = field.bytes().await.map_err(rejected)?;
        return Ok(ImageUpload {
            file_name,
            content_type,
            body,
        });
    }
    Err(ActionError::field(FILE_FIELD, "No file provided"))
}

fn rejected(err: MultipartError) -> ActionError {
    warn!(error = %err, "Rejected multipart upload");
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ActionError::field(
            FILE_FIELD,
            "File size must be under 2 MB. Please compress your image.",
        )
    } else {
        ActionError::field(FILE_FIELD, err.body_text())
    }
}
