use chrono::Utc;

use crate::{
    entities::storage::{Bucket, ImageUpload, StoredObject, UploadOptions, PUBLIC_OBJECT_PREFIX},
    errors::{AppError, StorageError},
    repositories::storage::ObjectStorage,
    utils::file_name::{object_path, sniff_image, validate_object_path},
};

/// Validates an image and stores it under a fresh, timestamped path.
pub async fn store_image<S: ObjectStorage>(
    storage: &S,
    bucket: Bucket,
    upload: ImageUpload,
    max_bytes: usize,
) -> Result<StoredObject, StorageError> {
    let content_type = sniff_image(&upload.bytes, max_bytes)?;
    let path = object_path(Utc::now().timestamp_millis(), &upload.file_name);
    storage
        .upload(bucket, &path, upload.bytes, &UploadOptions::image(content_type))
        .await
}

/// The bucket and object path a public image URL points at, whatever host
/// it was issued under. Site-relative URLs are accepted as well.
pub fn object_ref_from_url(url: &str) -> Option<(Bucket, String)> {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) if url.starts_with('/') => url.split(['?', '#']).next().unwrap_or(url).to_string(),
        Err(_) => return None,
    };
    let rest = path.strip_prefix(PUBLIC_OBJECT_PREFIX)?.strip_prefix('/')?;
    let (bucket, object) = rest.split_once('/')?;
    let bucket = bucket.parse().ok()?;
    let object = urlencoding::decode(object).ok()?.into_owned();
    validate_object_path(&object).ok()?;
    Some((bucket, object))
}

/// Deletes the object behind `url` when it lives in `bucket`. Failures are
/// logged and swallowed; the orphan sweep picks up leftovers.
pub async fn discard_image<S: ObjectStorage>(storage: &S, bucket: Bucket, url: &str) {
    let path = match object_ref_from_url(url) {
        Some((owner_bucket, path)) if owner_bucket == bucket => path,
        _ => {
            tracing::debug!(%bucket, %url, "Image is not stored in this bucket; nothing to delete");
            return;
        }
    };
    match storage.delete(bucket, &path).await {
        Ok(()) => tracing::info!(%bucket, %path, "Deleted stored image"),
        Err(e) => tracing::warn!(%bucket, %path, "Failed to delete stored image: {}", e),
    }
}

/// Direct bucket uploads from the dashboard.
pub struct StorageHandler<S: ObjectStorage> {
    pub storage: S,
    pub max_upload_bytes: usize,
}

impl<S: ObjectStorage> StorageHandler<S> {
    pub fn new(storage: S, max_upload_bytes: usize) -> Self {
        StorageHandler { storage, max_upload_bytes }
    }

    pub async fn upload(&self, bucket: &str, upload: ImageUpload) -> Result<StoredObject, AppError> {
        let bucket: Bucket = bucket.parse()?;
        let stored = store_image(&self.storage, bucket, upload, self.max_upload_bytes)
            .await
            .map_err(|e| {
                if let StorageError::Io(cause) = &e {
                    tracing::error!(%bucket, "Upload failed: {}", cause);
                }
                AppError::from(e)
            })?;

        tracing::info!(%bucket, path = %stored.path, "Uploaded image");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_urls_resolve_regardless_of_host() {
        let expected = Some((Bucket::Projects, "1700000000000-site.png".to_string()));
        for url in [
            "https://api.example.com/storage/v1/object/public/projects/1700000000000-site.png",
            "http://127.0.0.1:8080/storage/v1/object/public/projects/1700000000000-site.png",
            "https://www.example.com/storage/v1/object/public/projects/1700000000000-site.png?v=2",
            "/storage/v1/object/public/projects/1700000000000-site.png#top",
        ] {
            assert_eq!(object_ref_from_url(url), expected, "{url}");
        }
    }

    #[test]
    fn foreign_or_malformed_urls_are_not_ours() {
        for url in [
            "https://cdn.example.com/images/site.png",
            "https://api.example.com/storage/v1/object/public/documents/cv.pdf",
            "https://api.example.com/storage/v1/object/public/projects/../secrets.png",
            "https://api.example.com/storage/v1/object/public/projects/",
            "placeholder.png",
        ] {
            assert_eq!(object_ref_from_url(url), None, "{url}");
        }
    }
}
