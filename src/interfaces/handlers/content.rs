use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::schema::OwnedEntity,
    errors::AppError,
    handlers::upload::read_image_upload,
    use_cases::extractors::AdminClaims,
    AppContentHandler,
};

type Handler<E> = web::Data<AppContentHandler<E>>;

#[instrument(skip_all, fields(entity = E::PLURAL))]
pub async fn list<E: OwnedEntity>(admin: AdminClaims, handler: Handler<E>) -> Result<HttpResponse, AppError> {
    let items = handler.list(&admin.owner_id()?).await?;
    Ok(HttpResponse::Ok().json(items))
}

#[instrument(skip_all, fields(entity = E::PLURAL))]
pub async fn create<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    input: web::Json<E::Input>,
) -> Result<HttpResponse, AppError> {
    let snapshot = handler.create(&admin.owner_id()?, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(snapshot))
}

#[instrument(skip_all, fields(entity = E::PLURAL, id = %path))]
pub async fn update<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    path: web::Path<Uuid>,
    input: web::Json<E::Input>,
) -> Result<HttpResponse, AppError> {
    let snapshot = handler.update(&admin.owner_id()?, &path, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[instrument(skip_all, fields(entity = E::PLURAL, id = %path))]
pub async fn delete<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = handler.delete(&admin.owner_id()?, &path).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[instrument(skip_all, fields(entity = E::PLURAL, id = %path))]
pub async fn upload_image<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_image_upload(payload, handler.settings.max_upload_bytes).await?;
    let snapshot = handler.replace_image(&admin.owner_id()?, &path, upload).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[instrument(skip_all, fields(entity = E::PLURAL, id = %path))]
pub async fn remove_image<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let snapshot = handler.remove_image(&admin.owner_id()?, &path).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

/// One-per-owner entities answer `null` until first saved.
pub async fn get_single<E: OwnedEntity>(admin: AdminClaims, handler: Handler<E>) -> Result<HttpResponse, AppError> {
    let item = handler.get_single(&admin.owner_id()?).await?;
    Ok(HttpResponse::Ok().json(item))
}

#[instrument(skip_all, fields(entity = E::PLURAL))]
pub async fn save_single<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    input: web::Json<E::Input>,
) -> Result<HttpResponse, AppError> {
    let snapshot = handler.save_single(&admin.owner_id()?, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}

#[instrument(skip_all, fields(entity = E::PLURAL))]
pub async fn upload_single_image<E: OwnedEntity>(
    admin: AdminClaims,
    handler: Handler<E>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_image_upload(payload, handler.settings.max_upload_bytes).await?;
    let snapshot = handler.replace_single_image(&admin.owner_id()?, upload).await?;
    Ok(HttpResponse::Ok().json(snapshot))
}
