use async_trait::async_trait;

use crate::{
    entities::storage::{Bucket, StoredObject, UploadOptions},
    errors::StorageError,
};

/// Bucketed object store for site images.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `bucket/path`. Fails with `AlreadyExists` unless
    /// `options.upsert` is set.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<StoredObject, StorageError>;

    fn public_url(&self, bucket: Bucket, path: &str) -> String;

    async fn delete(&self, bucket: Bucket, path: &str) -> Result<(), StorageError>;

    async fn list(&self, bucket: Bucket) -> Result<Vec<StoredObject>, StorageError>;
}
