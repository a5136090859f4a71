use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::kernel::BaseImageStorage;

/// Object storage client for the image bucket.
///
/// Speaks the storage REST API of the managed backend:
/// `POST {base}/storage/v1/object/{bucket}/{path}` to upload and
/// `{base}/storage/v1/object/public/{bucket}/{path}` for public reads.
pub struct StorageClient {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

impl StorageClient {
    pub fn new(base_url: &str, service_key: String, bucket: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
            bucket,
        }
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }
}

#[async_trait]
impl BaseImageStorage for StorageClient {
    async fn upload(&self, path: &str, content_type: &str, body: Bytes) -> Result<String> {
        info!(bucket = %self.bucket, path = %path, size = body.len(), "Uploading image");

        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(reqwest::header::CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(body)
            .send()
            .await
            .context("Storage upload request failed")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Storage upload rejected");
            anyhow::bail!("Upload failed: storage API error {}: {}", status, body);
        }

        // The API answers with "{bucket}/{path}"; fall back to the requested path.
        let stored = response
            .json::<UploadResponse>()
            .await
            .ok()
            .and_then(|r| r.key)
            .and_then(|key| {
                key.strip_prefix(&format!("{}/", self.bucket))
                    .map(str::to_string)
            })
            .unwrap_or_else(|| path.to_string());

        Ok(stored)
    }

    fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}
