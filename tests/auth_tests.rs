
use chrono::Utc;
use mockall::{mock, predicate::eq};
use uuid::Uuid;

use folio_api::{
    auth::{jwt::JwtService, password::hash_password},
    entities::user::{ForgotPasswordRequest, LoginUser, NewUser, UpdatePasswordRequest, User, UserInsert},
    errors::{AppError, AuthError},
    repositories::{token::TokenServiceRepository, user::UserRepository},
    use_cases::auth::{AuthHandler, RESET_REQUESTED_MESSAGE},
};
use test_utils::{test_config, CapturingNotifier, MemoryRevocations};

mock! {
    pub UserRepo {}

    #[async_trait::async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn count_users(&self) -> Result<u64, AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn get_site_owner(&self) -> Result<Option<User>, AppError>;
        async fn update_password(&self, id: &Uuid, password_hash: &str) -> Result<(), AppError>;
    }
}

const PASSWORD: &str = "Lantern!Orchard42";

type TestAuthHandler = AuthHandler<MockUserRepo, JwtService, CapturingNotifier, MemoryRevocations>;

fn owner() -> User {
    User {
        id: Uuid::new_v4(),
        email: "owner@example.com".to_string(),
        username: Some("owner".to_string()),
        password_hash: hash_password(PASSWORD).unwrap(),
        is_admin: true,
        is_verified: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn handler(repo: MockUserRepo) -> (TestAuthHandler, CapturingNotifier, MemoryRevocations) {
    let notifier = CapturingNotifier::default();
    let revocations = MemoryRevocations::default();
    let config = test_config();
    let handler = AuthHandler::new(
        repo,
        JwtService::new(&config),
        notifier.clone(),
        revocations.clone(),
        config.reset_password_url(),
    );
    (handler, notifier, revocations)
}

#[tokio::test]
async fn first_sign_up_creates_a_verified_admin() {
    let mut repo = MockUserRepo::new();
    repo.expect_count_users().returning(|| Ok(0));
    repo.expect_create_user()
        .withf(|user: &UserInsert| user.is_admin && user.is_verified && user.email == "owner@example.com")
        .times(1)
        .returning(|_| Ok(Uuid::new_v4()));

    let (handler, _, _) = handler(repo);
    let response = handler
        .register(NewUser {
            email: " Owner@Example.com ".to_string(),
            password: PASSWORD.to_string(),
            username: None,
        })
        .await;

    assert!(response.is_ok());
}

#[tokio::test]
async fn sign_up_is_closed_once_an_owner_exists() {
    let mut repo = MockUserRepo::new();
    repo.expect_count_users().returning(|| Ok(1));
    repo.expect_create_user().never();

    let (handler, _, _) = handler(repo);
    assert!(!handler.signup_status().await.unwrap().signup_open);

    let err = handler
        .register(NewUser {
            email: "intruder@example.com".to_string(),
            password: PASSWORD.to_string(),
            username: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ForbiddenAccess(_)));
}

#[tokio::test]
async fn login_rejects_wrong_password_and_unknown_email_alike() {
    let user = owner();
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email()
        .with(eq("owner@example.com"))
        .returning(move |_| Ok(Some(user.clone())));
    repo.expect_get_user_by_email()
        .with(eq("nobody@example.com"))
        .returning(|_| Ok(None));

    let (handler, _, _) = handler(repo);

    let wrong_password = handler
        .login(LoginUser { email: "owner@example.com".into(), password: "not-it".into() })
        .await
        .unwrap_err();
    let unknown_email = handler
        .login(LoginUser { email: "nobody@example.com".into(), password: PASSWORD.into() })
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AuthError::WrongCredentials));
    assert!(matches!(unknown_email, AuthError::WrongCredentials));
}

#[tokio::test]
async fn padded_addresses_are_trimmed_before_lookup() {
    let user = owner();
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email()
        .with(eq("owner@example.com"))
        .times(2)
        .returning(move |_| Ok(Some(user.clone())));

    let (handler, notifier, _) = handler(repo);

    let tokens = handler
        .login(LoginUser { email: " Owner@Example.com ".into(), password: PASSWORD.into() })
        .await
        .unwrap();
    assert!(!tokens.access_token.is_empty());

    handler
        .request_password_reset(ForgotPasswordRequest { email: "  OWNER@example.com\n".into() })
        .await
        .unwrap();
    assert_eq!(notifier.sent.lock().len(), 1);
}

#[tokio::test]
async fn refresh_rotates_and_retires_the_presented_token() {
    let user = owner();
    let id = user.id;
    let mut repo = MockUserRepo::new();
    let login_user = user.clone();
    repo.expect_get_user_by_email().returning(move |_| Ok(Some(login_user.clone())));
    repo.expect_get_user_by_id().with(eq(id)).returning(move |_| Ok(Some(user.clone())));

    let (handler, _, _) = handler(repo);
    let tokens = handler
        .login(LoginUser { email: "owner@example.com".into(), password: PASSWORD.into() })
        .await
        .unwrap();

    let rotated = handler.refresh_token(&tokens.refresh_token).await.unwrap();
    assert_ne!(rotated.refresh_token, tokens.refresh_token);

    let replay = handler.refresh_token(&tokens.refresh_token).await.unwrap_err();
    assert!(matches!(replay, AuthError::TokenRevoked));
}

#[tokio::test]
async fn logout_revokes_the_access_token() {
    let user = owner();
    let (handler, _, _) = handler(MockUserRepo::new());
    let access = handler.token_service.create_jwt(&user).unwrap();
    let refresh = handler.token_service.create_refresh_jwt(&user.id).unwrap();
    let claims = handler.token_service.decode_jwt(&access).unwrap().claims;

    assert!(!handler.is_access_revoked(&claims).await.unwrap());
    handler.logout(&claims, &refresh).await.unwrap();
    assert!(handler.is_access_revoked(&claims).await.unwrap());
}

#[tokio::test]
async fn logout_refuses_someone_elses_refresh_token() {
    let user = owner();
    let (handler, _, revocations) = handler(MockUserRepo::new());
    let access = handler.token_service.create_jwt(&user).unwrap();
    let foreign_refresh = handler.token_service.create_refresh_jwt(&Uuid::new_v4()).unwrap();
    let claims = handler.token_service.decode_jwt(&access).unwrap().claims;

    let err = handler.logout(&claims, &foreign_refresh).await.unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken));
    assert!(revocations.keys.lock().is_empty());
}

#[tokio::test]
async fn reset_requests_answer_the_same_for_unknown_addresses() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email().returning(|_| Ok(None));

    let (handler, notifier, _) = handler(repo);
    let message = handler
        .request_password_reset(ForgotPasswordRequest { email: "stranger@example.com".into() })
        .await
        .unwrap();

    assert_eq!(message, RESET_REQUESTED_MESSAGE);
    assert!(notifier.sent.lock().is_empty());
}

#[tokio::test]
async fn reset_link_recovers_a_session_for_the_owner() {
    let user = owner();
    let id = user.id;
    let mut repo = MockUserRepo::new();
    let by_email = user.clone();
    repo.expect_get_user_by_email().returning(move |_| Ok(Some(by_email.clone())));
    repo.expect_get_user_by_id().with(eq(id)).returning(move |_| Ok(Some(user.clone())));

    let (handler, notifier, _) = handler(repo);
    handler
        .request_password_reset(ForgotPasswordRequest { email: "owner@example.com".into() })
        .await
        .unwrap();

    let (email, link) = notifier.sent.lock()[0].clone();
    assert_eq!(email, "owner@example.com");
    assert!(link.starts_with("https://folio.example.com/"));
    assert!(link.contains("type=recovery"));

    let session = handler.recover_session(&link).await.unwrap();
    assert_eq!(session.user.id, id);
    assert!(session.tokens.is_some());
}

#[tokio::test]
async fn mismatched_confirmation_never_touches_the_password() {
    let user = owner();
    let mut repo = MockUserRepo::new();
    repo.expect_update_password().never();

    let (handler, _, _) = handler(repo);
    let access = handler.token_service.create_jwt(&user).unwrap();
    let claims = handler.token_service.decode_jwt(&access).unwrap().claims;

    let err = handler
        .update_password(
            &claims,
            UpdatePasswordRequest {
                password: PASSWORD.to_string(),
                confirm_password: "Lantern!Orchard43".to_string(),
            },
        )
        .await
        .unwrap_err();

    match err {
        AppError::ValidationError(fields) => assert!(fields.iter().any(|f| f.field == "confirm_password")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn matching_passwords_are_hashed_before_storage() {
    let user = owner();
    let id = user.id;
    let mut repo = MockUserRepo::new();
    repo.expect_update_password()
        .withf(move |user_id, hash| *user_id == id && hash.starts_with("$argon2") && !hash.contains(PASSWORD))
        .times(1)
        .returning(|_, _| Ok(()));

    let (handler, _, _) = handler(repo);
    let access = handler.token_service.create_jwt(&user).unwrap();
    let claims = handler.token_service.decode_jwt(&access).unwrap().claims;

    handler
        .update_password(
            &claims,
            UpdatePasswordRequest { password: PASSWORD.to_string(), confirm_password: PASSWORD.to_string() },
        )
        .await
        .unwrap();
}
