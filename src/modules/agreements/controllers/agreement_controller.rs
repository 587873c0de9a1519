use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::error::AppError;
use crate::middleware::auth::AuthenticatedUser;
use crate::modules::agreements::models::CreateAgreementRequest;
use crate::modules::agreements::services::AgreementService;

/// POST /api/agreements (staff)
pub async fn create_agreement(
    service: web::Data<Arc<AgreementService>>,
    user: AuthenticatedUser,
    request: web::Json<CreateAgreementRequest>,
) -> Result<HttpResponse, AppError> {
    user.require_staff()?;

    let agreement = service.create_agreement(request.into_inner()).await?;

    Ok(HttpResponse::Created().json(agreement))
}

/// GET /api/agreements/{id}
pub async fn get_agreement(
    service: web::Data<Arc<AgreementService>>,
    _user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let agreement = service.get_agreement(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(agreement))
}

/// Registers `/agreements` routes; the payments module adds `/agreements/{id}/payments`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/agreements", web::post().to(create_agreement))
        .route("/agreements/{id}", web::get().to(get_agreement));
}
