use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::bookings::services::BookingService;

/// GET /api/schedules/{booking_id}
pub async fn get_schedule(
    service: web::Data<Arc<BookingService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let schedule = service.get_schedule(path.into_inner(), &user).await?;

    Ok(HttpResponse::Ok().json(schedule))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/schedules").route("/{booking_id}", web::get().to(get_schedule)));
}
