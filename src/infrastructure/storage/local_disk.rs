use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::{
    entities::storage::{Bucket, ObjectMeta, StoredObject, UploadOptions, PUBLIC_OBJECT_PREFIX},
    errors::StorageError,
    repositories::storage::ObjectStorage,
    utils::file_name::validate_object_path,
};

const META_DIR: &str = ".meta";

/// Objects live at `<root>/<bucket>/<path>`; metadata sidecars at
/// `<root>/.meta/<bucket>/<path>.json`.
#[derive(Clone, Debug)]
pub struct LocalDiskStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalDiskStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        LocalDiskStorage {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_file(&self, bucket: Bucket, path: &str) -> Result<PathBuf, StorageError> {
        validate_object_path(path)?;
        Ok(self.root.join(bucket.as_str()).join(path))
    }

    fn meta_file(&self, bucket: Bucket, path: &str) -> PathBuf {
        self.root.join(META_DIR).join(bucket.as_str()).join(format!("{path}.json"))
    }

    async fn read_meta(&self, bucket: Bucket, path: &str, file: &Path) -> Result<ObjectMeta, StorageError> {
        match fs::read(self.meta_file(bucket, path)).await {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| StorageError::Io(e.to_string())),
            // objects copied in by hand have no sidecar
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let metadata = fs::metadata(file).await?;
                Ok(ObjectMeta {
                    content_type: "application/octet-stream".to_string(),
                    cache_control: "3600".to_string(),
                    size: metadata.len(),
                    uploaded_at: metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now()),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Location and metadata of a stored object, for serving it.
    pub async fn resolve(&self, bucket: Bucket, path: &str) -> Result<(PathBuf, ObjectMeta), StorageError> {
        let file = self.object_file(bucket, path)?;
        if !fs::try_exists(&file).await? {
            return Err(StorageError::NotFound(format!("{bucket}/{path}")));
        }
        let meta = self.read_meta(bucket, path, &file).await?;
        Ok((file, meta))
    }

    /// Whether the storage root can be reached.
    pub async fn is_available(&self) -> bool {
        fs::create_dir_all(&self.root).await.is_ok()
    }

    fn stored(&self, bucket: Bucket, path: &str, meta: &ObjectMeta) -> StoredObject {
        StoredObject {
            bucket,
            path: path.to_string(),
            public_url: self.public_url(bucket, path),
            size: meta.size,
            content_type: meta.content_type.clone(),
            uploaded_at: meta.uploaded_at,
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalDiskStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError> {
        let file = self.object_file(bucket, path)?;
        if !options.upsert && fs::try_exists(&file).await? {
            return Err(StorageError::AlreadyExists(format!("{bucket}/{path}")));
        }

        let meta = ObjectMeta {
            content_type: options.content_type.clone(),
            cache_control: options.cache_control.clone(),
            size: bytes.len() as u64,
            uploaded_at: Utc::now(),
        };
        let meta_file = self.meta_file(bucket, path);

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Some(parent) = meta_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&file, &bytes).await?;
        let raw_meta = serde_json::to_vec(&meta).map_err(|e| StorageError::Io(e.to_string()))?;
        fs::write(&meta_file, raw_meta).await?;

        tracing::debug!(%bucket, %path, size = meta.size, "Stored object");
        Ok(self.stored(bucket, path, &meta))
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}{}/{}/{}", self.public_base_url, PUBLIC_OBJECT_PREFIX, bucket, path)
    }

    async fn delete(&self, bucket: Bucket, path: &str) -> Result<(), StorageError> {
        let file = self.object_file(bucket, path)?;
        fs::remove_file(&file).await?;

        if let Err(e) = fs::remove_file(self.meta_file(bucket, path)).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(%bucket, %path, "Failed to remove object metadata: {}", e);
            }
        }
        Ok(())
    }

    async fn list(&self, bucket: Bucket) -> Result<Vec<StoredObject>, StorageError> {
        let dir = self.root.join(bucket.as_str());
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let meta = self.read_meta(bucket, &name, &entry.path()).await?;
            objects.push(self.stored(bucket, &name, &meta));
        }

        objects.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::storage::object_ref_from_url;

    fn temp_storage() -> LocalDiskStorage {
        let root = std::env::temp_dir().join(format!("folio-storage-{}", uuid::Uuid::new_v4()));
        LocalDiskStorage::new(root, "https://api.example.com/")
    }

    #[test]
    fn public_urls_point_back_at_their_object() {
        let storage = temp_storage();
        let url = storage.public_url(Bucket::Skills, "1700000000000-rust.png");
        assert_eq!(url, "https://api.example.com/storage/v1/object/public/skills/1700000000000-rust.png");
        assert_eq!(
            object_ref_from_url(&url),
            Some((Bucket::Skills, "1700000000000-rust.png".to_string()))
        );
    }

    #[tokio::test]
    async fn upload_refuses_overwrite_unless_upsert() {
        let storage = temp_storage();
        let mut options = UploadOptions::image("image/png");

        let stored = storage.upload(Bucket::Projects, "a.png", vec![1, 2, 3], &options).await.unwrap();
        assert_eq!(stored.size, 3);

        let again = storage.upload(Bucket::Projects, "a.png", vec![4], &options).await;
        assert!(matches!(again, Err(StorageError::AlreadyExists(_))));

        options.upsert = true;
        storage.upload(Bucket::Projects, "a.png", vec![4], &options).await.unwrap();

        let (file, meta) = storage.resolve(Bucket::Projects, "a.png").await.unwrap();
        assert_eq!(tokio::fs::read(file).await.unwrap(), vec![4]);
        assert_eq!(meta.content_type, "image/png");
        assert_eq!(meta.cache_control, "3600");

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }

    #[tokio::test]
    async fn list_and_delete() {
        let storage = temp_storage();
        let options = UploadOptions::image("image/png");
        storage.upload(Bucket::Avatars, "b.png", vec![0], &options).await.unwrap();
        storage.upload(Bucket::Avatars, "a.png", vec![0], &options).await.unwrap();

        let listed = storage.list(Bucket::Avatars).await.unwrap();
        assert_eq!(listed.iter().map(|o| o.path.as_str()).collect::<Vec<_>>(), vec!["a.png", "b.png"]);
        assert!(storage.list(Bucket::Skills).await.unwrap().is_empty());

        storage.delete(Bucket::Avatars, "a.png").await.unwrap();
        assert!(matches!(storage.resolve(Bucket::Avatars, "a.png").await, Err(StorageError::NotFound(_))));
        assert!(matches!(storage.delete(Bucket::Avatars, "a.png").await, Err(StorageError::NotFound(_))));

        let _ = tokio::fs::remove_dir_all(storage.root()).await;
    }
}
