use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::payments::models::GeneratePlanRequest;
use crate::modules::payments::services::PaymentService;

/// POST /api/payments/generate-plan (staff)
pub async fn generate_plan(
    service: web::Data<Arc<PaymentService>>,
    user: AuthenticatedUser,
    request: web::Json<GeneratePlanRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let summary = service
        .generate_installment_plan(request.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(summary))
}

/// POST /api/payments/{id}/initiate
/// Only the customer who owns the booking may initiate.
pub async fn initiate_payment(
    service: web::Data<Arc<PaymentService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .initiate_payment(path.into_inner(), user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(payment))
}

/// GET /api/payments/{id}/installments
pub async fn list_installments(
    service: web::Data<Arc<PaymentService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let installments = service
        .list_payment_installments(path.into_inner(), &user)
        .await?;

    Ok(HttpResponse::Ok().json(installments))
}

/// GET /api/agreements/{id}/payments
pub async fn list_agreement_payments(
    service: web::Data<Arc<PaymentService>>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let payments = service
        .list_agreement_payments(path.into_inner(), &user)
        .await?;

    Ok(HttpResponse::Ok().json(payments))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("/generate-plan", web::post().to(generate_plan))
            .route("/{id}/initiate", web::post().to(initiate_payment))
            .route("/{id}/installments", web::get().to(list_installments)),
    )
    .route(
        "/agreements/{id}/payments",
        web::get().to(list_agreement_payments),
    );
}
