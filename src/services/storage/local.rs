use async_trait::async_trait;
use chrono::Utc;
use std::env;
use std::path::PathBuf;

use super::{StorageBackend, StorageError};

/// Stockage sur disque local; les fichiers sont servis ensuite par
/// actix-files sous /uploads
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_env() -> Self {
        let root = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        Self::new(root)
    }
}

/// Ne garde que les caractères sûrs pour un nom de fichier
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl StorageBackend for LocalStorage {
    async fn store(
        &self,
        filename: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError> {
        // Même convention de nommage que l'ancien serveur: timestamp-nom
        let stored_name = format!("{}-{}", Utc::now().timestamp_millis(), sanitize_filename(filename));

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&stored_name), data).await?;

        Ok(format!("/uploads/{}", stored_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("cat fail #3.mp4"), "cat_fail__3.mp4");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[tokio::test]
    async fn test_store_writes_file_and_returns_url() {
        let dir = env::temp_dir().join(format!("media-store-test-{}", std::process::id()));
        let storage = LocalStorage::new(&dir);

        let url = storage
            .store("clip.mp4", "video/mp4", b"fake video bytes".to_vec())
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-clip.mp4"));

        let stored = dir.join(url.trim_start_matches("/uploads/"));
        let contents = tokio::fs::read(&stored).await.unwrap();
        assert_eq!(contents, b"fake video bytes");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
