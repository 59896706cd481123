//! HTTP server utility methods

use crate::server::server::HttpServer;
use crate::utils::error::ExporterError;
use std::io;

impl HttpServer {
    /// Turn a bind failure into a readable error
    pub(crate) fn format_bind_error(error: io::Error, bind_addr: &str) -> ExporterError {
        match error.kind() {
            io::ErrorKind::AddrInUse => ExporterError::server(format!(
                "address {} is already in use, pick another one with --bind",
                bind_addr
            )),
            io::ErrorKind::PermissionDenied => ExporterError::server(format!(
                "permission denied binding {}, use a port >= 1024",
                bind_addr
            )),
            _ => ExporterError::server(format!("failed to bind to {}: {}", bind_addr, error)),
        }
    }
}
