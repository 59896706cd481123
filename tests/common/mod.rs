//! Common test utilities for mongodb-query-exporter
//!
//! - [`drivers::ScriptedDriver`] stands in for a MongoDB deployment
//! - [`fixtures`] builds aggregations and configurations
//! - [`assertions`] inspects scraped text

pub mod assertions;
pub mod drivers;
pub mod fixtures;

pub use drivers::ScriptedDriver;

/// Skip test if environment variable is not set
#[macro_export]
macro_rules! skip_without_env {
    ($var:expr) => {
        if std::env::var($var).is_err() {
            eprintln!("Skipping test: {} environment variable not set", $var);
            return;
        }
    };
}
