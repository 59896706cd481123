//! HTTP server
//!
//! Serves the metrics path, `/healthz`, and a hint on `/`.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;
mod utils;

pub use builder::{build_collector, run_server};
pub use server::HttpServer;
pub use state::AppState;
