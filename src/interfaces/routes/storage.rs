use actix_web::web;

use crate::{entities::storage::PUBLIC_OBJECT_PREFIX, handlers::storage};

/// Public object reads, outside `/api/v1`.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("{PUBLIC_OBJECT_PREFIX}/{{bucket}}/{{path:.*}}"))
            .route(web::get().to(storage::serve_object))
    );
}
