//! Object storage for uploaded images.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("unsupported content type {0:?}, expected an image")]
    UnsupportedType(String),

    #[error("upload is empty")]
    Empty,

    #[error("invalid folder name {0:?}")]
    InvalidFolder(String),

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-once blob storage returning public URLs.
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `folder`, returning the public URL of the new object.
    fn put(&self, folder: &str, content_type: &str, bytes: &[u8]) -> Result<String, BlobError>;
}

/// Map an image MIME type to the file extension used for storage.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.as_str() {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/svg+xml" => Some("svg"),
        "image/avif" => Some("avif"),
        _ => None,
    }
}

fn valid_folder(folder: &str) -> bool {
    !folder.is_empty()
        && folder
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Stores blobs as files below a directory that is served statically.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Uploads live in `<assets_dir>/uploads`, served as `/assets/uploads/...`.
    pub fn under_assets(assets_dir: &Path) -> Self {
        Self::new(assets_dir.join("uploads"), "/assets/uploads")
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, folder: &str, content_type: &str, bytes: &[u8]) -> Result<String, BlobError> {
        if !valid_folder(folder) {
            return Err(BlobError::InvalidFolder(folder.to_string()));
        }
        let ext = extension_for(content_type)
            .ok_or_else(|| BlobError::UnsupportedType(content_type.to_string()))?;
        if bytes.is_empty() {
            return Err(BlobError::Empty);
        }

        let token = Uuid::new_v4().simple().to_string();
        let file_name = format!("{}-{}.{}", Utc::now().timestamp_millis(), &token[..8], ext);

        let dir = self.root.join(folder);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(&file_name), bytes)?;

        tracing::info!(folder, file = %file_name, size = bytes.len(), "Blob stored");
        Ok(format!("{}/{}/{}", self.public_base, folder, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> FsBlobStore {
        let dir = std::env::temp_dir().join(format!("umpmusic-blobs-{}", Uuid::new_v4()));
        FsBlobStore::under_assets(&dir)
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(extension_for("image/png"), Some("png"));
        assert_eq!(extension_for("image/jpeg; charset=binary"), Some("jpg"));
        assert_eq!(extension_for("IMAGE/WEBP"), Some("webp"));
        assert_eq!(extension_for("image/svg+xml"), Some("svg"));
        assert_eq!(extension_for("text/html"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn test_put_writes_file_and_returns_url() {
        let store = temp_store();
        let url = store.put("artists", "image/png", b"\x89PNG fake").unwrap();
        assert!(url.starts_with("/assets/uploads/artists/"));
        assert!(url.ends_with(".png"));

        let file = url.trim_start_matches("/assets/uploads/");
        assert_eq!(fs::read(store.root().join(file)).unwrap(), b"\x89PNG fake");

        let _ = fs::remove_dir_all(store.root().parent().unwrap());
    }

    #[test]
    fn test_put_rejections() {
        let store = temp_store();
        assert!(matches!(store.put("artists", "text/plain", b"x"), Err(BlobError::UnsupportedType(_))));
        assert!(matches!(store.put("artists", "image/png", b""), Err(BlobError::Empty)));
        assert!(matches!(store.put("../etc", "image/png", b"x"), Err(BlobError::InvalidFolder(_))));
        assert!(matches!(store.put("", "image/png", b"x"), Err(BlobError::InvalidFolder(_))));
    }
}
