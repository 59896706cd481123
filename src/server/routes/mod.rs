//! HTTP routes

pub mod health;
pub mod metrics;

use crate::config::HEALTHZ_PATH;
use actix_web::web;

/// Register the health, metrics and index routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, metrics_path: &str) {
    cfg.route(HEALTHZ_PATH, web::get().to(health::healthz))
        .route(metrics_path, web::get().to(metrics::metrics));

    if metrics_path != "/" {
        cfg.route("/", web::get().to(metrics::index));
    }
}
