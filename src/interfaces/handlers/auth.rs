use actix_web::{get, post, web, HttpResponse};
use tracing::instrument;

use crate::entities::token::RefreshTokenRequest;
use crate::entities::user::{
    ForgotPasswordRequest, LoginUser, LogoutRequest, NewUser, RecoverSessionRequest, UpdatePasswordRequest,
};
use crate::errors::{AppError, AuthError};
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[get("/signup-status")]
pub async fn signup_status(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let status = state.auth_handler.signup_status().await?;
    Ok(HttpResponse::Ok().json(status))
}

#[post("/register")]
#[instrument(skip_all)]
pub async fn register(state: web::Data<AppState>, user: web::Json<NewUser>) -> Result<HttpResponse, AppError> {
    let response = state.auth_handler.register(user.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

#[post("/login")]
#[instrument(skip_all)]
pub async fn login(state: web::Data<AppState>, user: web::Json<LoginUser>) -> Result<HttpResponse, AuthError> {
    let auth_response = state.auth_handler.login(user.into_inner()).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[post("/refresh-token")]
#[instrument(skip_all)]
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AuthError> {
    let auth_response = state.auth_handler.refresh_token(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(auth_response))
}

#[post("/logout")]
#[instrument(skip_all, fields(user_id = %claims.0.sub))]
pub async fn logout(
    claims: AuthClaims,
    state: web::Data<AppState>,
    body: web::Json<LogoutRequest>,
) -> Result<HttpResponse, AuthError> {
    state.auth_handler.logout(&claims.0, &body.refresh_token).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Logged out successfully"})))
}

#[get("/session")]
pub async fn session(claims: AuthClaims, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let current = state.auth_handler.session(&claims.0).await?;
    Ok(HttpResponse::Ok().json(current))
}

#[post("/session/recover")]
#[instrument(skip_all)]
pub async fn recover_session(
    state: web::Data<AppState>,
    body: web::Json<RecoverSessionRequest>,
) -> Result<HttpResponse, AuthError> {
    let recovered = state.auth_handler.recover_session(&body.fragment).await?;
    Ok(HttpResponse::Ok().json(recovered))
}

#[post("/password/forgot")]
#[instrument(skip_all)]
pub async fn forgot_password(
    state: web::Data<AppState>,
    body: web::Json<ForgotPasswordRequest>,
) -> Result<HttpResponse, AppError> {
    let message = state.auth_handler.request_password_reset(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": message })))
}

#[post("/password/update")]
#[instrument(skip_all, fields(user_id = %claims.0.sub))]
pub async fn update_password(
    claims: AuthClaims,
    state: web::Data<AppState>,
    body: web::Json<UpdatePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    state.auth_handler.update_password(&claims.0, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Password updated successfully"})))
}
