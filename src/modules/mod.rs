pub mod agreements;
pub mod bookings;
pub mod health;
pub mod payments;
pub mod users;
pub mod vehicles;

use actix_web::web;

/// Routes mounted under `/api`
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    users::controllers::configure(cfg);
    vehicles::controllers::configure(cfg);
    bookings::controllers::configure(cfg);
    agreements::controllers::configure(cfg);
    payments::controllers::configure(cfg);
}
