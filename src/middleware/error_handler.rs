// Extractor error handlers that keep rejected bodies, paths and queries in the
// same `{"error": {...}}` envelope as AppError responses.

use actix_web::{
    error::{JsonPayloadError, PathError, QueryPayloadError},
    web, Error, HttpRequest,
};

use crate::core::AppError;

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::invalid_argument(format!("Invalid request body: {}", err)).into()
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::invalid_argument(format!("Invalid path parameter: {}", err)).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    log_rejection(req, &err);
    AppError::invalid_argument(format!("Invalid query string: {}", err)).into()
}

fn log_rejection(req: &HttpRequest, err: &dyn std::fmt::Display) {
    tracing::debug!(
        method = %req.method(),
        path = %req.path(),
        error = %err,
        "Rejected request input"
    );
}

/// Extractor configs wired into the App
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}
