pub mod health_handler;
pub mod study_handler;

use actix_web::web;

/// Registers every REST route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(health_handler::configure)
        .configure(study_handler::configure);
}
