use std::time::Instant;

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub database: DatabaseCheck,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseCheck {
    pub reachable: bool,
    pub latency_ms: Option<u128>,
}

/// GET /health - liveness, no dependency checks
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /ready - readiness, pings MySQL
pub async fn readiness_check(pool: web::Data<MySqlPool>) -> impl Responder {
    let started = Instant::now();

    let database = match sqlx::query("SELECT 1").execute(pool.get_ref()).await {
        Ok(_) => DatabaseCheck {
            reachable: true,
            latency_ms: Some(started.elapsed().as_millis()),
        },
        Err(e) => {
            tracing::error!(error = %e, "Database readiness check failed");
            DatabaseCheck {
                reachable: false,
                latency_ms: None,
            }
        }
    };

    let response = ReadinessResponse {
        ready: database.reachable,
        database,
    };

    if response.ready {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/ready", web::get().to(readiness_check));
}
