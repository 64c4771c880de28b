use actix_web::{web, HttpRequest, HttpResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::contact_message::{ContactForm, MarkReadRequest},
    errors::AppError,
    handlers::json_error::too_many_requests,
    use_cases::extractors::AdminClaims,
    utils::get_client_ip::get_client_ip,
    AppState,
};

const EMAIL_LIMIT: u64 = 2;
const EMAIL_WINDOW_SECS: u64 = 3600;

#[instrument(skip_all)]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, AppError> {
    let ip = get_client_ip(&req, state.config.trust_forwarded_for);
    let decision = state.contact_limiter.check(&ip);
    if !decision.allowed {
        tracing::warn!(%ip, "Contact form rate limit hit");
        return Ok(too_many_requests(
            "Too many messages from this address. Please try again later.",
            decision.retry_after,
        ));
    }

    if let Some(redis) = &state.redis {
        // keep the key safe whatever the address contains
        let email_key = format!("rl:contact:{}", urlencoding::encode(&form.normalized_email()));
        match redis.incr_with_ttl(&email_key, EMAIL_WINDOW_SECS).await {
            Ok(count) if count > EMAIL_LIMIT => {
                return Ok(too_many_requests(
                    "Too many messages from this email address. Please try again later.",
                    Some(EMAIL_WINDOW_SECS),
                ));
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Email rate limit skipped: {}", e),
        }
    }

    let received = state.contact_handler.submit(form.into_inner()).await?;
    Ok(HttpResponse::Created().json(received))
}

pub async fn list_messages(_admin: AdminClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let inbox = state.contact_handler.list().await?;
    Ok(HttpResponse::Ok().json(inbox))
}

#[instrument(skip_all, fields(id = %path))]
pub async fn mark_read(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: Option<web::Json<MarkReadRequest>>,
) -> Result<HttpResponse, AppError> {
    let read = body.map(|b| b.read).unwrap_or(true);
    let message = state.contact_handler.mark_read(&path, read).await?;
    Ok(HttpResponse::Ok().json(message))
}

#[instrument(skip_all, fields(id = %path))]
pub async fn delete_message(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.contact_handler.delete(&path).await?;
    Ok(HttpResponse::NoContent().finish())
}
