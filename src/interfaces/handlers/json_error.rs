use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// 429 with a `Retry-After` header when the wait is known.
pub fn too_many_requests(details: &str, retry_after: Option<u64>) -> HttpResponse {
    let mut response = json_error(StatusCode::TOO_MANY_REQUESTS, "Too many requests", details);
    if let Some(seconds) = retry_after {
        if let Ok(value) = seconds.to_string().parse() {
            response.headers_mut().insert(actix_web::http::header::RETRY_AFTER, value);
        }
    }
    response
}
