//! Scrape endpoint

use crate::monitoring::scrape;
use crate::server::state::AppState;
use actix_web::{HttpResponse, web};
use tracing::{debug, error};

/// Runs a collection and returns it in the prometheus text format
pub async fn metrics(state: web::Data<AppState>) -> HttpResponse {
    debug!("Scrape requested");

    match scrape(&state.collector).await {
        Ok(exposition) => HttpResponse::Ok()
            .content_type(exposition.content_type)
            .body(exposition.body),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            HttpResponse::InternalServerError()
                .content_type("text/plain; charset=utf-8")
                .body(e.to_string())
        }
    }
}

/// Points clients at the metrics path
pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("Use the {} endpoint", state.metrics_path()))
}
