use actix_web::web;

use crate::handlers::auth;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signup_status)
            .service(auth::register)
            .service(auth::login)
            .service(auth::refresh_token)
            .service(auth::logout)
            .service(auth::session)
            .service(auth::recover_session)
            .service(auth::forgot_password)
            .service(auth::update_password)
    );
}
