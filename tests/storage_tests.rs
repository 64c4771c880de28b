
use std::collections::HashSet;

use chrono::Duration;

use folio_api::{
    background_task::sweep_orphans,
    entities::storage::{Bucket, UploadOptions},
    errors::StorageError,
    repositories::storage::ObjectStorage,
    storage::local_disk::LocalDiskStorage,
    use_cases::storage::object_ref_from_url,
};
use test_utils::MemoryStorage;

fn temp_root() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("folio-sweep-{}", uuid::Uuid::new_v4()))
}

fn references(urls: &[&str]) -> HashSet<(Bucket, String)> {
    urls.iter().filter_map(|url| object_ref_from_url(url)).collect()
}

/// Objects uploaded this instant count as past a negative grace period.
fn no_grace() -> Duration {
    Duration::minutes(-1)
}

#[actix_rt::test]
async fn sweep_keeps_images_referenced_under_an_older_host_or_another_bucket() {
    let root = temp_root();
    let before = LocalDiskStorage::new(&root, "http://127.0.0.1:8080");
    let options = UploadOptions::image("image/png");

    let project = before.upload(Bucket::Projects, "1-site.png", vec![1], &options).await.unwrap();
    let shared = before.upload(Bucket::Skills, "2-logo.png", vec![2], &options).await.unwrap();
    before.upload(Bucket::Skills, "3-stale.png", vec![3], &options).await.unwrap();

    // project rows point at both files; the base URL has since moved
    let referenced = references(&[&project.public_url, &shared.public_url]);
    let after = LocalDiskStorage::new(&root, "https://api.example.com");

    let removed = sweep_orphans(&after, &referenced, no_grace()).await.unwrap();

    assert_eq!(removed, 1);
    assert!(after.resolve(Bucket::Projects, "1-site.png").await.is_ok());
    assert!(after.resolve(Bucket::Skills, "2-logo.png").await.is_ok());
    assert!(matches!(
        after.resolve(Bucket::Skills, "3-stale.png").await,
        Err(StorageError::NotFound(_))
    ));

    let _ = tokio::fs::remove_dir_all(&root).await;
}

#[actix_rt::test]
async fn sweep_leaves_fresh_uploads_alone() {
    let storage = MemoryStorage::default();
    let options = UploadOptions::image("image/png");
    storage.upload(Bucket::Avatars, "1-me.png", vec![1], &options).await.unwrap();

    let removed = sweep_orphans(&storage, &HashSet::new(), Duration::hours(24)).await.unwrap();

    assert_eq!(removed, 0);
    assert!(storage.contains(Bucket::Avatars, "1-me.png"));
}

#[actix_rt::test]
async fn failed_orphan_deletes_are_skipped() {
    let storage = MemoryStorage { fail_deletes: true, ..MemoryStorage::default() };
    let options = UploadOptions::image("image/png");
    storage.upload(Bucket::Projects, "1-old.png", vec![1], &options).await.unwrap();

    let removed = sweep_orphans(&storage, &HashSet::new(), no_grace()).await.unwrap();

    assert_eq!(removed, 0);
    assert_eq!(storage.len(), 1);
}
