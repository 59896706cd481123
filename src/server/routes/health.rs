//! Liveness endpoint

use actix_web::HttpResponse;
use tracing::trace;

/// Answers `OK` while the process is serving
pub async fn healthz() -> HttpResponse {
    trace!("Health check requested");
    HttpResponse::Ok().content_type("text/plain; charset=utf-8").body("OK")
}
