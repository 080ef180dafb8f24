use crate::naming::encode_blob_name;
use crate::traits::{BlobStore, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

const CONTENT_TYPE_SUFFIX: &str = ".content-type";

/// Local filesystem blob store for development
///
/// Objects live at `{base_path}/{container}/{name}`; each object's content
/// type is kept next to it in `{name}.content-type`.
#[derive(Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    container: String,
    base_url: String,
}

impl LocalBlobStore {
    /// Create a new LocalBlobStore, creating the container directory if missing
    ///
    /// # Arguments
    /// * `base_path` - Root directory for blob storage (e.g., "./data/blobs")
    /// * `container` - Container directory under `base_path`
    /// * `base_url` - Base URL the files are served from (e.g., "http://localhost:5000/blobs")
    pub async fn new(
        base_path: impl Into<PathBuf>,
        container: impl Into<String>,
        base_url: impl Into<String>,
    ) -> StorageResult<Self> {
        let container = container.into();
        let root = base_path.into().join(&container);

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalBlobStore {
            root,
            container,
            base_url: base_url.into(),
        })
    }

    /// Map a blob name to its file, rejecting anything that could leave the container directory
    fn name_to_path(&self, name: &str) -> StorageResult<PathBuf> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.ends_with(CONTENT_TYPE_SUFFIX)
        {
            return Err(StorageError::InvalidName(name.to_string()));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn exists(&self, name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(name)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> StorageResult<String> {
        let path = self.name_to_path(name)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        let mut sidecar = path.clone().into_os_string();
        sidecar.push(CONTENT_TYPE_SUFFIX);
        fs::write(&sidecar, content_type).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write content type: {}", e))
        })?;

        let url = self.url_for(name);

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(url)
    }

    fn url_for(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.container,
            encode_blob_name(name)
        )
    }

    fn container_name(&self) -> &str {
        &self.container
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_exists() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::new(dir.path(), "uploads", "http://localhost:5000/blobs/")
            .await
            .expect("store");

        assert!(!store.exists("cat_20240101000000.gif").await.unwrap());

        let url = store
            .put(
                "cat_20240101000000.gif",
                Bytes::from_static(b"GIF89a"),
                "image/gif",
            )
            .await
            .unwrap();

        assert_eq!(
            url,
            "http://localhost:5000/blobs/uploads/cat_20240101000000.gif"
        );
        assert!(store.exists("cat_20240101000000.gif").await.unwrap());
        let content_type = std::fs::read_to_string(
            dir.path()
                .join("uploads")
                .join("cat_20240101000000.gif.content-type"),
        )
        .unwrap();
        assert_eq!(content_type, "image/gif");
    }

    #[tokio::test]
    async fn rejects_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::new(dir.path(), "uploads", "http://localhost")
            .await
            .expect("store");

        for name in ["../escape.png", "a/b.png", "a\\b.png", "..", ".", ""] {
            assert!(matches!(
                store.exists(name).await,
                Err(StorageError::InvalidName(_))
            ));
        }
    }

    #[tokio::test]
    async fn double_dots_inside_a_name_are_allowed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::new(dir.path(), "uploads", "http://localhost")
            .await
            .expect("store");

        let name = "my..photo_20240101000000.png";
        assert!(!store.exists(name).await.unwrap());
        store
            .put(name, Bytes::from_static(b"png"), "image/png")
            .await
            .unwrap();
        assert!(store.exists(name).await.unwrap());
    }

    #[tokio::test]
    async fn url_is_percent_encoded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalBlobStore::new(dir.path(), "uploads", "http://localhost/blobs")
            .await
            .expect("store");

        assert_eq!(
            store.url_for("my photo#1_20240101000000.png"),
            "http://localhost/blobs/uploads/my%20photo%231_20240101000000.png"
        );
    }
}
