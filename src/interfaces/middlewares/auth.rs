use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{entities::token::Claims, errors::AuthError, AppState};

const ADMIN_PREFIX: &str = "/api/v1/admin";

/// Decodes the bearer token on protected routes and stores its claims in
/// the request extensions.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = req.path().to_string();

            if is_public_route(&path, req.method()) {
                return service.call(req).await;
            }

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                tracing::error!("AppState missing in middleware");
                return Err(AuthError::MissingJwtService.into());
            };

            let Some(token) = extract_token(&req) else {
                tracing::warn!(%path, "Missing or malformed Authorization header");
                return Ok(reject(req, AuthError::MissingCredentials));
            };

            let claims: Claims = match state.auth_handler.token_service.decode_jwt(&token) {
                Ok(decoded) => decoded.claims,
                Err(e) => {
                    tracing::warn!(%path, "Rejected bearer token: {}", e);
                    return Ok(reject(req, e));
                }
            };

            match state.auth_handler.is_access_revoked(&claims).await {
                Ok(false) => {}
                Ok(true) => {
                    tracing::warn!(user_id = %claims.sub, "Revoked access token presented");
                    return Ok(reject(req, AuthError::TokenRevoked));
                }
                Err(e) => {
                    tracing::error!("Revocation check failed: {}", e);
                    return Ok(reject(req, e));
                }
            }

            if let Err(e) = enforce_admin_access(&path, &claims) {
                return Ok(reject(req, e));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &Method) -> bool {
    if method == Method::OPTIONS {
        return true;
    }

    if method == Method::GET
        && (path == "/"
            || path == "/health"
            || path == "/api/v1/site"
            || path.starts_with("/api/v1/pages/")
            || path.starts_with("/storage/v1/object/public/"))
    {
        return true;
    }

    matches!(
        (path, method.as_str()),
        ("/api/v1/contact", "POST")
            | ("/api/v1/auth/signup-status", "GET")
            | ("/api/v1/auth/register", "POST")
            | ("/api/v1/auth/login", "POST")
            | ("/api/v1/auth/refresh-token", "POST")
            | ("/api/v1/auth/session/recover", "POST")
            | ("/api/v1/auth/password/forgot", "POST")
    )
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn enforce_admin_access(path: &str, claims: &Claims) -> Result<(), AuthError> {
    if path.starts_with(ADMIN_PREFIX) && !claims.admin {
        tracing::warn!(user_id = %claims.sub, %path, "Admin access required");
        return Err(AuthError::Forbidden("Admin access required".into()));
    }
    Ok(())
}

fn reject(req: ServiceRequest, err: AuthError) -> ServiceResponse<BoxBody> {
    let response = HttpResponse::from_error(err);
    req.into_response(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes_cover_site_and_sign_in() {
        assert!(is_public_route("/api/v1/pages/home", &Method::GET));
        assert!(is_public_route("/storage/v1/object/public/skills/a.png", &Method::GET));
        assert!(is_public_route("/api/v1/auth/login", &Method::POST));
        assert!(is_public_route("/api/v1/admin/skills", &Method::OPTIONS));

        assert!(!is_public_route("/api/v1/admin/skills", &Method::GET));
        assert!(!is_public_route("/api/v1/auth/logout", &Method::POST));
        assert!(!is_public_route("/api/v1/contact", &Method::GET));
    }
}
