//! Media domain - featured and social images uploaded to the storage bucket

pub mod actions;

pub use actions::{upload_image, ImageUpload, UploadedImage, MAX_IMAGE_BYTES};
