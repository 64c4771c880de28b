use actix_web::web;

use crate::handlers::{home::home, system::health_check};
use crate::AppState;

mod admin;
mod auth;
mod json_error;
mod public;
mod storage;

pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &web::Data<AppState>) {
    cfg.service(home);
    cfg.service(health_check);
    cfg.configure(storage::config_routes);

    cfg.service(
        web::scope("/api/v1")
            .configure(auth::config_routes)
            .configure(public::config_routes)
            .configure(|cfg| admin::config_routes(cfg, &state.content))
    );

    cfg.configure(json_error::config_routes);
}
