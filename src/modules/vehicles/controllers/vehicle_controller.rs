use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::vehicles::models::{CreateVehicleImageRequest, CreateVehicleRequest};
use crate::modules::vehicles::services::VehicleService;

/// Query parameters for listing vehicles
#[derive(Debug, Deserialize)]
pub struct ListVehiclesQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// POST /api/vehicles
pub async fn create_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateVehicleRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let vehicle = service.create_vehicle(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(vehicle))
}

/// GET /api/vehicles
pub async fn list_vehicles(
    service: web::Data<Arc<VehicleService>>,
    _user: AuthenticatedUser,
    query: web::Query<ListVehiclesQuery>,
) -> Result<HttpResponse, AppError> {
    let vehicles = service.list_vehicles(query.limit, query.offset).await?;

    Ok(HttpResponse::Ok().json(vehicles))
}

/// GET /api/vehicles/{id}
pub async fn get_vehicle(
    service: web::Data<Arc<VehicleService>>,
    _user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let vehicle = service.get_vehicle(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(vehicle))
}

/// PUT /api/vehicles/{id}
pub async fn update_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<CreateVehicleRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let vehicle = service
        .update_vehicle(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(vehicle))
}

/// DELETE /api/vehicles/{id}
pub async fn delete_vehicle(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    service.delete_vehicle(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/vehicles/{id}/images
pub async fn add_image(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<CreateVehicleImageRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let image = service
        .add_image(path.into_inner(), request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(image))
}

/// DELETE /api/vehicle-images/{id}
pub async fn delete_image(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    service.delete_image(path.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/vehicle-images/{id}/primary
pub async fn set_primary_image(
    service: web::Data<Arc<VehicleService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let image = service.set_primary_image(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(image))
}

/// Configure vehicle and vehicle image routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vehicles")
            .route("", web::post().to(create_vehicle))
            .route("", web::get().to(list_vehicles))
            .route("/{id}", web::get().to(get_vehicle))
            .route("/{id}", web::put().to(update_vehicle))
            .route("/{id}", web::delete().to(delete_vehicle))
            .route("/{id}/images", web::post().to(add_image)),
    )
    .service(
        web::scope("/vehicle-images")
            .route("/{id}", web::delete().to(delete_image))
            .route("/{id}/primary", web::put().to(set_primary_image)),
    );
}
