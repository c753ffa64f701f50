use async_trait::async_trait;
use std::env;

use super::{StorageBackend, StorageError};

/// Upload vers Cloudinary (unsigned, via upload_preset). L'appel bloque la
/// requête jusqu'à la fin de l'upload; pas de retry.
pub struct CloudinaryStorage {
    cloud_name: String,
    upload_preset: String,
    client: reqwest::Client,
}

impl CloudinaryStorage {
    pub fn from_env() -> Self {
        Self {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME").unwrap_or_else(|_| "demo".to_string()),
            upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .unwrap_or_else(|_| "unsigned".to_string()),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl StorageBackend for CloudinaryStorage {
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|e| StorageError::Upload(format!("Invalid content type: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.upload_preset.clone())
            .part("file", part);

        // "auto" laisse Cloudinary router vidéos et images
        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Upload(format!(
                "Cloudinary returned {}: {}",
                status, body
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        body["secure_url"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| StorageError::Upload("Missing secure_url in response".to_string()))
    }
}
