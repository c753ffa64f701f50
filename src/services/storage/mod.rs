// Adaptateur de stockage des fichiers envoyés (vidéos, images de profil
// partenaire). Reçoit le payload entier en mémoire et retourne une URL
// durable: objet distant (Cloudinary) ou disque local en fallback.
pub mod cloudinary;
pub mod local;

use async_trait::async_trait;
use std::env;
use std::sync::Arc;
use thiserror::Error;

pub use cloudinary::CloudinaryStorage;
pub use local::LocalStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Stocke le payload et retourne l'URL publique du fichier
    async fn store(
        &self,
        filename: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, StorageError>;
}

/// Choisit le backend selon STORAGE_BACKEND ("cloudinary" ou "local",
/// local par défaut)
pub fn from_env() -> Arc<dyn StorageBackend> {
    match env::var("STORAGE_BACKEND").as_deref() {
        Ok("cloudinary") => Arc::new(CloudinaryStorage::from_env()),
        _ => Arc::new(LocalStorage::from_env()),
    }
}
