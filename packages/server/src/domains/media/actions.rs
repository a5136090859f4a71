use bytes::Bytes;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::common::ActionError;
use crate::kernel::ServerDeps;

/// 2 MiB
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

const INVALID_TYPE_MESSAGE: &str = "Invalid file type. Please upload JPG, PNG, WebP, or GIF.";
const TOO_LARGE_MESSAGE: &str = "File size must be under 2 MB. Please compress your image.";

/// A file received from the admin editor
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub body: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    /// Object path inside the bucket
    pub path: String,
    pub public_url: String,
}

/// Stored extension for an accepted content type (jpeg, png, webp, gif)
fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

impl ImageUpload {
    /// Checks type and size. Returns the extension the object is stored under;
    /// the client's file name never reaches the storage path.
    pub fn validate(&self) -> Result<&'static str, ActionError> {
        let Some(extension) = image_extension(&self.content_type) else {
            return Err(ActionError::field("file", INVALID_TYPE_MESSAGE));
        };
        if self.body.len() > MAX_IMAGE_BYTES {
            return Err(ActionError::field("file", TOO_LARGE_MESSAGE));
        }
        Ok(extension)
    }
}

/// `{unix_millis}-{random}.{ext}`
fn object_name(extension: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        &random[..11],
        extension
    )
}

/// Upload an image and resolve its public URL.
pub async fn upload_image(upload: ImageUpload, deps: &ServerDeps) -> Result<UploadedImage, ActionError> {
    let extension = upload.validate()?;

    let name = object_name(extension);
    info!(
        name = %name,
        file_name = %upload.file_name,
        size = upload.body.len(),
        content_type = %upload.content_type,
        "Uploading image"
    );

    let path = deps
        .storage
        .upload(&name, &upload.content_type, upload.body)
        .await
        .map_err(|e| ActionError::store("Image upload failed", e))?;

    Ok(UploadedImage {
        public_url: deps.storage.public_url(&path),
        path,
    })
}
