use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::{ACCESS_DENY_PREFIX, REFRESH_DENY_PREFIX};
use crate::auth::password::{hash_password, verify_password};
use crate::entities::token::{AuthResponse, Claims, SessionResponse};
use crate::entities::user::{
    normalize_email, ForgotPasswordRequest, LoginUser, NewUser, NewUserResponse, PublicUser,
    SignupStatus, UpdatePasswordRequest, User,
};
use crate::errors::{AppError, AuthError};
use crate::repositories::notifier::ResetLinkNotifier;
use crate::repositories::revocation::TokenRevocation;
use crate::repositories::token::TokenServiceRepository;
use crate::repositories::user::UserRepository;
use crate::use_cases::recovery::{build_recovery_link, parse_recovery_fragment};

pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent.";

pub struct AuthHandler<R, T, N, V>
where
    R: UserRepository,
    T: TokenServiceRepository,
    N: ResetLinkNotifier,
    V: TokenRevocation,
{
    pub user_repo: R,
    pub token_service: T,
    pub notifier: N,
    pub revocations: V,
    reset_url: String,
}

fn seconds_until(exp: usize) -> u64 {
    let now = Utc::now().timestamp().max(0) as usize;
    exp.saturating_sub(now) as u64
}

fn user_id_from(sub: &str) -> Result<Uuid, AuthError> {
    Uuid::parse_str(sub).map_err(|_| AuthError::InvalidUserId)
}

impl<R, T, N, V> AuthHandler<R, T, N, V>
where
    R: UserRepository,
    T: TokenServiceRepository,
    N: ResetLinkNotifier,
    V: TokenRevocation,
{
    pub fn new(user_repo: R, token_service: T, notifier: N, revocations: V, reset_url: String) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            notifier,
            revocations,
            reset_url,
        }
    }

    /// Sign-up stays open until the site has its owner.
    pub async fn signup_status(&self) -> Result<SignupStatus, AppError> {
        let users = self.user_repo.count_users().await?;
        Ok(SignupStatus { signup_open: users == 0 })
    }

    /// Registers the site owner. Every later attempt is refused.
    pub async fn register(&self, mut request: NewUser) -> Result<NewUserResponse, AppError> {
        if self.user_repo.count_users().await? > 0 {
            tracing::warn!("Rejected sign-up: the site already has an owner");
            return Err(AppError::ForbiddenAccess("Sign up is disabled".to_string()));
        }

        request.email = normalize_email(&request.email);
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);
        let id = self.user_repo.create_user(&user_insert).await?;

        tracing::info!(user_id = %id, "Site owner registered");
        Ok(NewUserResponse {
            id,
            message: "User created successfully".to_string(),
        })
    }

    /// Logs in a user by validating credentials and generating JWTs
    pub async fn login(&self, mut request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|e| {
                tracing::error!("User lookup failed during login: {}", e);
                AuthError::WrongCredentials
            })?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)?;
        let refresh_token = self.token_service.create_refresh_jwt(&user.id)?;
        Ok(AuthResponse::new(access_token, refresh_token, self.token_service.access_ttl_seconds()))
    }

    /// Issues a new pair and retires the refresh token that was presented.
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.decode_refresh_jwt(token)?.claims;

        if self.revocations.is_revoked(REFRESH_DENY_PREFIX, &claims.jti).await? {
            tracing::warn!("Revoked refresh token presented");
            return Err(AuthError::TokenRevoked);
        }

        let user_id = user_id_from(&claims.sub)?;
        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        self.revocations
            .revoke(REFRESH_DENY_PREFIX, &claims.jti, seconds_until(claims.exp))
            .await?;

        self.create_auth_response(&user)
    }

    pub async fn logout(&self, access: &Claims, refresh_token: &str) -> Result<(), AuthError> {
        let refresh = self.token_service.decode_refresh_jwt(refresh_token)?.claims;
        if refresh.sub != access.sub {
            return Err(AuthError::InvalidToken);
        }

        self.revocations
            .revoke(ACCESS_DENY_PREFIX, &access.jti, seconds_until(access.exp))
            .await?;
        self.revocations
            .revoke(REFRESH_DENY_PREFIX, &refresh.jti, seconds_until(refresh.exp))
            .await?;

        tracing::info!(user_id = %access.sub, "User logged out");
        Ok(())
    }

    pub async fn is_access_revoked(&self, claims: &Claims) -> Result<bool, AuthError> {
        self.revocations.is_revoked(ACCESS_DENY_PREFIX, &claims.jti).await
    }

    /// Current user for a bearer token.
    pub async fn session(&self, claims: &Claims) -> Result<SessionResponse, AppError> {
        let user_id = user_id_from(&claims.sub)?;
        let user = self.user_repo.get_user_by_id(&user_id)
            .await?
            .ok_or(AppError::UnauthorizedAccess)?;

        Ok(SessionResponse { user: PublicUser::from(user), tokens: None })
    }

    /// Sends a recovery link when the address belongs to the owner. The
    /// caller always gets the same answer.
    pub async fn request_password_reset(&self, mut request: ForgotPasswordRequest) -> Result<&'static str, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let user = match self.user_repo.get_user_by_email(&request.email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                tracing::info!("Password reset requested for an unknown address");
                return Ok(RESET_REQUESTED_MESSAGE);
            }
            Err(e) => {
                tracing::error!("User lookup failed during password reset: {}", e);
                return Ok(RESET_REQUESTED_MESSAGE);
            }
        };

        let access_token = self.token_service.create_recovery_jwt(&user)?;
        let refresh_token = self.token_service.create_refresh_jwt(&user.id)?;
        let link = build_recovery_link(
            &self.reset_url,
            &access_token,
            &refresh_token,
            self.token_service.recovery_ttl_seconds(),
        );

        if let Err(e) = self.notifier.send_reset_link(&user.email, &link).await {
            tracing::error!(user_id = %user.id, "Failed to deliver reset link: {}", e);
        }

        Ok(RESET_REQUESTED_MESSAGE)
    }

    /// Turns the tokens in a reset link's fragment into a session.
    pub async fn recover_session(&self, fragment: &str) -> Result<SessionResponse, AuthError> {
        let recovery = parse_recovery_fragment(fragment)?;

        let access = self.token_service.decode_jwt(&recovery.access_token)?.claims;
        let refresh = self.token_service.decode_refresh_jwt(&recovery.refresh_token)?.claims;
        if access.sub != refresh.sub {
            return Err(AuthError::InvalidRecoveryLink("token mismatch".into()));
        }
        if self.revocations.is_revoked(REFRESH_DENY_PREFIX, &refresh.jti).await? {
            return Err(AuthError::TokenRevoked);
        }

        let user_id = user_id_from(&access.sub)?;
        let user = self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::AuthenticationFailed)?
            .ok_or(AuthError::WrongCredentials)?;

        let expires_in = recovery
            .expires_in
            .unwrap_or_else(|| seconds_until(access.exp) as i64);
        let tokens = AuthResponse::new(recovery.access_token, recovery.refresh_token, expires_in);

        Ok(SessionResponse { user: PublicUser::from(user), tokens: Some(tokens) })
    }

    /// Sets a new password for the signed-in user.
    pub async fn update_password(&self, claims: &Claims, request: UpdatePasswordRequest) -> Result<(), AppError> {
        request.validate()?;

        let user_id = user_id_from(&claims.sub)?;
        let hashed_password = hash_password(&request.password)?;
        self.user_repo.update_password(&user_id, &hashed_password).await?;

        tracing::info!(%user_id, "Password updated");
        Ok(())
    }
}
