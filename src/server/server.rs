//! HTTP server core implementation

use crate::config::Config;
use crate::core::collector::Collector;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::error::{ExporterError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use tracing::info;

/// HTTP server exposing the collector
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    pub fn new(config: Config, collector: Collector) -> Self {
        Self {
            state: AppState::new(config, collector),
        }
    }

    /// Create the Actix-web application
    fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let metrics_path = state.metrics_path().to_string();

        App::new()
            .app_data(state)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", crate::NAME)))
            .configure(|cfg| routes::configure_routes(cfg, &metrics_path))
    }

    /// Start the HTTP server and run until it is stopped
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.state.config.bind_address();
        let metrics_path = self.state.metrics_path().to_string();

        let state = web::Data::new(self.state);
        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr))?
            .run();

        info!("Serving metrics on http://{}{}", bind_addr, metrics_path);

        server
            .await
            .map_err(|e| ExporterError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
