
use actix_web::{
    http::{header, StatusCode},
    test, web, App,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use folio_api::{
    entities::user::User, middlewares::auth::AuthMiddleware,
    repositories::token::TokenServiceRepository, routes::configure_routes, AppState,
};
use test_utils::test_config;

/// The pool never connects; every request here is answered before the
/// database would be touched.
fn state() -> web::Data<AppState> {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .unwrap();
    web::Data::new(AppState::new(&config, pool))
}

macro_rules! app {
    ($state:expr) => {{
        let app_state: web::Data<AppState> = $state.clone();
        let routes_state = app_state.clone();
        test::init_service(
            App::new()
                .app_data(app_state)
                .wrap(AuthMiddleware)
                .configure(move |cfg| configure_routes(cfg, &routes_state)),
        )
        .await
    }};
}

fn bearer_for(state: &AppState, is_admin: bool) -> String {
    let user = User {
        id: Uuid::new_v4(),
        email: "someone@example.com".to_string(),
        username: None,
        password_hash: String::new(),
        is_admin,
        is_verified: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let token = state.auth_handler.token_service.create_jwt(&user).unwrap();
    format!("Bearer {token}")
}

#[actix_rt::test]
async fn banner_is_public() {
    let app = app!(state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Ok");
}

#[actix_rt::test]
async fn admin_routes_need_a_token() {
    let app = app!(state());

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/v1/admin/skills").to_request()).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn garbage_tokens_are_rejected() {
    let app = app!(state());

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects")
        .insert_header((header::AUTHORIZATION, "Bearer not.a.jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_routes_refuse_non_admin_tokens() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/messages")
        .insert_header((header::AUTHORIZATION, bearer_for(&state, false)))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn invalid_skill_is_a_400_with_field_details() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/skills")
        .insert_header((header::AUTHORIZATION, bearer_for(&state, true)))
        .set_json(json!({ "name": "", "category": "Cooking", "proficiency": 140 }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"proficiency"));
}

#[actix_rt::test]
async fn malformed_json_uses_the_error_envelope() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/skills")
        .insert_header((header::AUTHORIZATION, bearer_for(&state, true)))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_rt::test]
async fn contact_form_is_rate_limited_per_address() {
    let state = state();
    let app = app!(state);
    let limit = state.config.contact_rate_per_hour;

    for _ in 0..limit {
        let req = test::TestRequest::post()
            .uri("/api/v1/contact")
            .set_json(json!({ "name": "A", "email": "nope", "message": "hi" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/contact")
        .set_json(json!({ "name": "Ada", "email": "ada@example.com", "message": "Hello there" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));
}

#[actix_rt::test]
async fn unknown_buckets_are_not_found() {
    let app = app!(state());

    let req = test::TestRequest::get()
        .uri("/storage/v1/object/public/documents/cv.pdf")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn session_routes_answer_without_a_database() {
    let app = app!(state());

    let req = test::TestRequest::get().uri("/api/v1/auth/session").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/session/recover")
        .set_json(json!({ "fragment": "https://folio.example.com/reset-password#type=recovery" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("missing tokens"));
}
