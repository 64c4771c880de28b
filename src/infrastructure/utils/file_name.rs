use std::path::Path;

use infer::MatcherType;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::StorageError;

static SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("object path pattern is valid")
});

/// Reduces an uploaded file name to a safe `slug.ext`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let path = Path::new(base);

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slug::slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "file".to_string());

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.chars().filter(char::is_ascii_alphanumeric).collect::<String>().to_lowercase())
        .filter(|e| !e.is_empty());

    match extension {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}

/// `<unix-millis>-<sanitized name>`; the prefix keeps names unique per upload.
pub fn object_path(unix_millis: i64, original: &str) -> String {
    format!("{}-{}", unix_millis, sanitize_file_name(original))
}

/// Rejects traversal and anything outside `[A-Za-z0-9._-]` segments.
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    if path.is_empty() || path.len() > 512 {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    let valid = path
        .split('/')
        .all(|segment| segment != ".." && SEGMENT.is_match(segment));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidPath(path.to_string()))
    }
}

/// Checks size and content; returns the sniffed MIME type of an image.
pub fn sniff_image(bytes: &[u8], max_bytes: usize) -> Result<&'static str, StorageError> {
    if bytes.len() > max_bytes {
        return Err(StorageError::TooLarge(max_bytes));
    }
    match infer::get(bytes) {
        Some(kind) if kind.matcher_type() == MatcherType::Image => Ok(kind.mime_type()),
        Some(kind) => Err(StorageError::UnsupportedType(kind.mime_type().to_string())),
        None => Err(StorageError::UnsupportedType("unrecognised content".to_string())),
    }
}
