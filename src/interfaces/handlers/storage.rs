use actix_files::NamedFile;
use actix_multipart::Multipart;
use actix_web::{
    http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE},
    web, HttpRequest, HttpResponse,
};
use tracing::instrument;

use crate::{
    entities::storage::{Bucket, UploadResponse},
    errors::{AppError, StorageError},
    handlers::upload::read_image_upload,
    use_cases::extractors::AdminClaims,
    AppState,
};

/// Stored values are either bare seconds or a full directive.
fn cache_control_header(stored: &str) -> String {
    if stored.chars().all(|c| c.is_ascii_digit()) && !stored.is_empty() {
        format!("public, max-age={stored}")
    } else {
        stored.to_string()
    }
}

#[instrument(skip_all, fields(bucket = %path))]
pub async fn upload_object(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_image_upload(payload, state.storage_handler.max_upload_bytes).await?;
    let stored = state.storage_handler.upload(&path, upload).await?;
    Ok(HttpResponse::Created().json(UploadResponse::from(stored)))
}

pub async fn serve_object(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (bucket, object) = path.into_inner();
    let bucket: Bucket = bucket.parse()?;

    let (file, meta) = state.storage.resolve(bucket, &object).await?;
    let named = NamedFile::open_async(&file).await.map_err(StorageError::from)?;

    let mut response = named.into_response(&req);
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&meta.content_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&cache_control_header(&meta.cache_control)) {
        headers.insert(CACHE_CONTROL, value);
    }
    Ok(response)
}
