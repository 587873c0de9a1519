use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http::header, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use mobigo::config::{logging, Config, DatabaseConfig};
use mobigo::middleware::{error_handler, BearerAuth, RequestId, TokenSigner};
use mobigo::modules::{self, health};
use mobigo::agreements::{AgreementService, PaymentCreator};
use mobigo::bookings::BookingService;
use mobigo::payments::{InstallmentRepository, PaymentService, PenaltyChecker};
use mobigo::users::UserService;
use mobigo::vehicles::VehicleService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    logging::init_tracing(&config.app);

    tracing::info!(
        env = %config.app.env,
        bind_address = %config.server.bind_address(),
        "Starting Mobigo backend"
    );

    let pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    DatabaseConfig::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!(
        database = %config.database.redacted_url(),
        max_connections = config.database.max_connections,
        "Database pool initialized and migrations applied"
    );

    let signer = Arc::new(TokenSigner::new(
        &config.auth.token_secret,
        config.auth.token_ttl_hours,
    ));

    let payment_service = Arc::new(PaymentService::new(
        pool.clone(),
        config.payment_gateway.base_url.clone(),
    ));
    let payment_creator: Arc<dyn PaymentCreator> = payment_service.clone();
    let agreement_service = Arc::new(AgreementService::new(pool.clone(), payment_creator));
    let booking_service = Arc::new(BookingService::new(pool.clone()));
    let vehicle_service = Arc::new(VehicleService::new(pool.clone()));
    let user_service = Arc::new(UserService::new(pool.clone(), signer.clone()));

    let penalty_checker = Arc::new(PenaltyChecker::new(
        Arc::new(InstallmentRepository::new(pool.clone())),
        &config.penalty,
    ));
    tokio::spawn(penalty_checker.start());

    let cors_origin = config.server.cors_allowed_origin.clone();
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .expose_headers(vec![header::HeaderName::from_static("x-request-id")])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(BearerAuth::new(signer.clone()))
            .wrap(cors)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(vehicle_service.clone()))
            .app_data(web::Data::new(booking_service.clone()))
            .app_data(web::Data::new(agreement_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .configure(error_handler::configure)
            .configure(health::controllers::configure)
            .service(web::scope("/api").configure(modules::configure_api))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!(bind_address = %bind_address, "HTTP server started");

    server.await.context("HTTP server error")
}
