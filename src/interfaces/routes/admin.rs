use actix_web::web;

use crate::{
    entities::schema::OwnedEntity,
    handlers::{contact, content, storage},
    AppContentHandler, ContentHandlers,
};

/// `GET, POST /`, `PUT, DELETE /{id}`, `POST, DELETE /{id}/image`.
fn collection<E: OwnedEntity>(cfg: &mut web::ServiceConfig, path: &str, handler: web::Data<AppContentHandler<E>>) {
    cfg.service(
        web::scope(path)
            .app_data(handler)
            .service(
                web::resource("")
                    .route(web::get().to(content::list::<E>))
                    .route(web::post().to(content::create::<E>))
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(content::update::<E>))
                    .route(web::delete().to(content::delete::<E>))
            )
            .service(
                web::resource("/{id}/image")
                    .route(web::post().to(content::upload_image::<E>))
                    .route(web::delete().to(content::remove_image::<E>))
            )
    );
}

/// `GET, PUT /` for one-per-owner entities.
fn single<E: OwnedEntity>(cfg: &mut web::ServiceConfig, path: &str, handler: web::Data<AppContentHandler<E>>) {
    let image_route = E::IMAGE.is_some();
    let mut scope = web::scope(path)
        .app_data(handler)
        .service(
            web::resource("")
                .route(web::get().to(content::get_single::<E>))
                .route(web::put().to(content::save_single::<E>))
        );
    if image_route {
        scope = scope.service(
            web::resource("/avatar").route(web::post().to(content::upload_single_image::<E>))
        );
    }
    cfg.service(scope);
}

pub fn config_routes(cfg: &mut web::ServiceConfig, content: &ContentHandlers) {
    cfg.service(
        web::scope("/admin")
            .configure(|cfg| {
                single(cfg, "/profile", content.profile.clone());
                single(cfg, "/personal-info", content.personal_info.clone());
                single(cfg, "/journey", content.journey.clone());

                collection(cfg, "/projects", content.projects.clone());
                collection(cfg, "/skills", content.skills.clone());
                collection(cfg, "/experience", content.experience.clone());
                collection(cfg, "/education", content.education.clone());
                collection(cfg, "/languages", content.languages.clone());
                collection(cfg, "/hobbies", content.hobbies.clone());
            })
            .service(
                web::scope("/messages")
                    .service(
                        web::resource("")
                            .route(web::get().to(contact::list_messages))
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::delete().to(contact::delete_message))
                    )
                    .service(
                        web::resource("/{id}/read")
                            .route(web::patch().to(contact::mark_read))
                    )
            )
            .service(
                web::resource("/storage/{bucket}")
                    .route(web::post().to(storage::upload_object))
            )
    );
}
