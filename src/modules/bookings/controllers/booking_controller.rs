use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::bookings::models::{
    ConfirmScheduleRequest, CreateBookingRequest, DeclineBookingRequest,
    UpdateBookingStatusRequest,
};
use crate::modules::bookings::services::BookingService;

/// POST /api/bookings
pub async fn create_booking(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    let booking = service
        .create_booking(user.user_id, request.vehicle_id, request.proposed_datetime)
        .await?;

    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/bookings
pub async fn list_bookings(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let bookings = service.list_bookings(&user).await?;

    Ok(HttpResponse::Ok().json(bookings))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let details = service.get_booking_details(path.into_inner(), &user).await?;

    Ok(HttpResponse::Ok().json(details))
}

/// POST /api/bookings/{id}/confirm (staff)
pub async fn confirm_schedule(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: Option<web::Json<ConfirmScheduleRequest>>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let request = request.map(|r| r.into_inner()).unwrap_or_default();
    let schedule = service
        .confirm_schedule(path.into_inner(), user.user_id, &request.notes)
        .await?;

    Ok(HttpResponse::Created().json(schedule))
}

/// PUT /api/bookings/{id}/decline (staff)
pub async fn decline_booking(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<DeclineBookingRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;
    request.validate()?;

    let booking = service
        .decline_booking(path.into_inner(), request.reason.trim())
        .await?;

    Ok(HttpResponse::Ok().json(booking))
}

/// PUT /api/bookings/{id}/status
pub async fn update_booking_status(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let target = request.target()?;

    let booking = service
        .update_booking_status(path.into_inner(), target, &user)
        .await?;

    Ok(HttpResponse::Ok().json(booking))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/bookings")
            .route("", web::post().to(create_booking))
            .route("", web::get().to(list_bookings))
            .route("/{id}", web::get().to(get_booking))
            .route("/{id}/confirm", web::post().to(confirm_schedule))
            .route("/{id}/decline", web::put().to(decline_booking))
            .route("/{id}/status", web::put().to(update_booking_status)),
    );
}
