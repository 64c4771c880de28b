use std::collections::HashSet;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::{interval, Duration};

use crate::{
    entities::{
        profile::Profile,
        project::Project,
        skill::Skill,
        storage::{Bucket, StoredObject},
    },
    errors::AppError,
    limiter::rate_limiter::SlidingWindowLimiter,
    repositories::{content::ContentRepository, storage::ObjectStorage},
    use_cases::storage::object_ref_from_url,
};

/// Paths in `objects` that nothing references and that are older than `cutoff`.
pub fn select_orphans(objects: &[StoredObject], referenced: &HashSet<String>, cutoff: DateTime<Utc>) -> Vec<String> {
    objects
        .iter()
        .filter(|object| object.uploaded_at < cutoff && !referenced.contains(&object.path))
        .map(|object| object.path.clone())
        .collect()
}

/// Every stored object some row points at. URLs are matched on their
/// object path, so rows keep their images across host changes and may
/// reference any bucket.
pub async fn referenced_objects<R>(repo: &R) -> Result<HashSet<(Bucket, String)>, AppError>
where
    R: ContentRepository<Profile> + ContentRepository<Project> + ContentRepository<Skill>,
{
    let mut urls = ContentRepository::<Profile>::image_urls(repo).await?;
    urls.extend(ContentRepository::<Project>::image_urls(repo).await?);
    urls.extend(ContentRepository::<Skill>::image_urls(repo).await?);

    Ok(urls.iter().filter_map(|url| object_ref_from_url(url)).collect())
}

/// One pass over every bucket; returns how many objects were deleted.
pub async fn sweep_orphans<S: ObjectStorage>(
    storage: &S,
    referenced: &HashSet<(Bucket, String)>,
    grace: ChronoDuration,
) -> Result<usize, AppError> {
    let cutoff = Utc::now() - grace;
    let mut removed = 0;

    for bucket in Bucket::ALL {
        let in_bucket: HashSet<String> = referenced
            .iter()
            .filter(|(owner, _)| *owner == bucket)
            .map(|(_, path)| path.clone())
            .collect();
        let objects = storage.list(bucket).await?;

        for path in select_orphans(&objects, &in_bucket, cutoff) {
            match storage.delete(bucket, &path).await {
                Ok(()) => {
                    tracing::info!(%bucket, %path, "Removed orphaned object");
                    removed += 1;
                }
                Err(e) => tracing::warn!(%bucket, %path, "Failed to remove orphaned object: {}", e),
            }
        }
    }

    Ok(removed)
}

pub async fn start_orphan_sweep<S, R>(storage: S, repo: R, every_minutes: u64, grace_hours: i64)
where
    S: ObjectStorage,
    R: ContentRepository<Profile> + ContentRepository<Project> + ContentRepository<Skill>,
{
    let mut interval = interval(Duration::from_secs(every_minutes.max(1) * 60));
    let grace = ChronoDuration::hours(grace_hours);

    loop {
        interval.tick().await;

        let outcome = match referenced_objects(&repo).await {
            Ok(referenced) => sweep_orphans(&storage, &referenced, grace).await,
            Err(e) => Err(e),
        };
        match outcome {
            Ok(count) => tracing::info!("Orphan sweep removed {} objects", count),
            Err(e) => tracing::error!("Orphan sweep failed: {}", e),
        }
    }
}

pub async fn start_limiter_eviction(limiter: SlidingWindowLimiter) {
    let mut interval = interval(Duration::from_secs(10 * 60));

    loop {
        interval.tick().await;

        let evicted = limiter.evict_idle();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = limiter.tracked_keys(), "Evicted idle rate-limit keys");
        }
    }
}
