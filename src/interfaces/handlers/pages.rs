use actix_web::{get, web, HttpResponse};

use crate::{errors::AppError, AppState};

#[get("/site")]
pub async fn site_info(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.site_info().await?))
}

#[get("/home")]
pub async fn home_page(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.home().await?))
}

#[get("/about")]
pub async fn about_page(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.about().await?))
}

#[get("/projects")]
pub async fn projects_page(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.projects_page().await?))
}

#[get("/skills")]
pub async fn skills_page(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.skills_page().await?))
}

#[get("/contact")]
pub async fn contact_page(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(state.pages_handler.contact_page().await?))
}
