use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::modules::users::models::{LoginRequest, RegisterUserRequest};
use crate::modules::users::services::UserService;

/// POST /api/users/register
pub async fn register_customer(
    service: web::Data<Arc<UserService>>,
    request: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service.register_customer(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/users/register-staff
pub async fn register_staff(
    service: web::Data<Arc<UserService>>,
    request: web::Json<RegisterUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = service.register_staff(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(user))
}

/// POST /api/users/login
pub async fn login(
    service: web::Data<Arc<UserService>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = service.login(request.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("/register", web::post().to(register_customer))
            .route("/register-staff", web::post().to(register_staff))
            .route("/login", web::post().to(login)),
    );
}
