use actix_web::web;

use crate::handlers::{contact, pages};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(pages::site_info);

    cfg.service(
        web::scope("/pages")
            .service(pages::home_page)
            .service(pages::about_page)
            .service(pages::projects_page)
            .service(pages::skills_page)
            .service(pages::contact_page)
    );

    cfg.service(
        web::resource("/contact")
            .route(web::post().to(contact::submit_contact))
    );
}
