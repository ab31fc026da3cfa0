pub mod assess;
pub mod crime;
pub mod environment;
pub mod health;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        .route("/assess", web::get().to(assess::assess))
        .route("/environment", web::get().to(environment::environment))
        .route("/crime/signals", web::get().to(crime::crime_signals));
}
