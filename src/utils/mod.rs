//! Utility modules for the exporter

pub mod error;
pub mod logging;
