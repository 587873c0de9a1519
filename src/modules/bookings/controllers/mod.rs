pub mod booking_controller;
pub mod schedule_controller;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    booking_controller::configure(cfg);
    schedule_controller::configure(cfg);
}
