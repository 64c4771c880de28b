use actix_multipart::Multipart;
use futures_util::StreamExt;

use crate::{entities::storage::ImageUpload, errors::AppError};

/// Reads the first file part of a multipart body, refusing anything over
/// `max_bytes` before it is fully buffered.
pub async fn read_image_upload(mut payload: Multipart, max_bytes: usize) -> Result<ImageUpload, AppError> {
    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?;

        let Some(file_name) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string)
        else {
            continue;
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Upload interrupted: {e}")))?;
            if bytes.len() + chunk.len() > max_bytes {
                tracing::warn!(%file_name, max_bytes, "Rejected oversized upload");
                return Err(AppError::PayloadTooLarge(format!("File exceeds {max_bytes} bytes")));
            }
            bytes.extend_from_slice(&chunk);
        }

        return Ok(ImageUpload { file_name, bytes });
    }

    Err(AppError::field("file", "An image file is required"))
}
