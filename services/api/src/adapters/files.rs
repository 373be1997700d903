//! services/api/src/adapters/files.rs
//!
//! Filesystem implementation of the `BlobStore` port. Uploaded files land in
//! the configured uploads directory under a timestamped, sanitized name and
//! are served back at `/uploads/{name}`.

use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tracing::warn;

use welcomebook_core::ports::{BlobStore, PortError, PortResult};

pub const PUBLIC_PREFIX: &str = "/uploads/";

#[derive(Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

/// Keeps `[A-Za-z0-9.-]`, replaces everything else with `_`. The stored name
/// never contains path separators.
fn sanitize_filename(original: &str) -> String {
    original
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '.' | '-' => c,
            _ => '_',
        })
        .collect()
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn save(&self, original_filename: &str, bytes: &[u8]) -> PortResult<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| PortError::Unexpected(format!("creating uploads dir: {e}")))?;

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(original_filename)
        );
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortError::Unexpected(format!("writing upload: {e}")))?;

        Ok(format!("{PUBLIC_PREFIX}{stored_name}"))
    }

    async fn remove(&self, url: &str) -> PortResult<()> {
        let Some(stored_name) = url.strip_prefix(PUBLIC_PREFIX) else {
            return Err(PortError::Unexpected(format!(
                "'{url}' is not an uploads locator"
            )));
        };
        // Stored names are sanitized at write time; refuse anything that
        // could escape the uploads directory.
        if stored_name.contains('/') || stored_name.contains("..") {
            return Err(PortError::Unexpected(format!(
                "'{url}' is not a valid stored name"
            )));
        }

        let path = self.root.join(stored_name);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!("could not delete file {}: {e}", path.display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_disallowed_characters() {
        assert_eq!(sanitize_filename("mi foto (1).jpg"), "mi_foto__1_.jpg");
        assert_eq!(sanitize_filename("clean-name.webm"), "clean-name.webm");
        assert_eq!(sanitize_filename("a/b\\c.png"), "a_b_c.png");
    }

    #[tokio::test]
    async fn save_then_remove_roundtrip() {
        let dir = std::env::temp_dir().join(format!("wb-uploads-{}", uuid::Uuid::new_v4()));
        let store = FsBlobStore::new(dir.clone());

        let url = store.save("photo.jpg", b"bytes").await.unwrap();
        assert!(url.starts_with(PUBLIC_PREFIX));
        assert!(url.ends_with("-photo.jpg"));

        let stored = dir.join(url.strip_prefix(PUBLIC_PREFIX).unwrap());
        assert!(stored.exists());

        store.remove(&url).await.unwrap();
        assert!(!stored.exists());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn remove_rejects_non_upload_locators() {
        let store = FsBlobStore::new(std::env::temp_dir());
        assert!(store.remove("/etc/passwd").await.is_err());
        assert!(store.remove("/uploads/../escape").await.is_err());
    }
}
