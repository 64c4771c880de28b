use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StorageError;

/// Path prefix every public object URL is served under.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

/// Public buckets that hold site images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Avatars,
    Projects,
    Skills,
}

impl Bucket {
    pub const ALL: [Bucket; 3] = [Bucket::Avatars, Bucket::Projects, Bucket::Skills];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Projects => "projects",
            Bucket::Skills => "skills",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "avatars" => Ok(Bucket::Avatars),
            "projects" => Ok(Bucket::Projects),
            "skills" => Ok(Bucket::Skills),
            other => Err(StorageError::UnknownBucket(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Max-age in seconds sent back as `Cache-Control`.
    pub cache_control: String,
    pub upsert: bool,
    pub content_type: String,
}

impl UploadOptions {
    pub fn image(content_type: impl Into<String>) -> Self {
        UploadOptions {
            cache_control: "3600".to_string(),
            upsert: false,
            content_type: content_type.into(),
        }
    }
}

/// Sidecar metadata kept next to every stored object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObjectMeta {
    pub content_type: String,
    pub cache_control: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredObject {
    pub bucket: Bucket,
    pub path: String,
    pub public_url: String,
    pub size: u64,
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// A file received from a multipart form, not yet validated.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub bucket: Bucket,
    pub path: String,
    pub public_url: String,
}

impl From<StoredObject> for UploadResponse {
    fn from(stored: StoredObject) -> Self {
        UploadResponse {
            bucket: stored.bucket,
            path: stored.path,
            public_url: stored.public_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_parse_from_path_segments() {
        for bucket in Bucket::ALL {
            assert_eq!(bucket.as_str().parse::<Bucket>().unwrap(), bucket);
        }
        assert!(matches!("documents".parse::<Bucket>(), Err(StorageError::UnknownBucket(_))));
    }
}
