//! Command line interface

use crate::config::{LogEncoding, Overrides};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// MongoDB aggregation pipelines as Prometheus metrics
#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "mongodb-query-exporter", version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file
    #[arg(short = 'f', long, env = "MDBEXPORTER_CONFIG")]
    pub file: Option<PathBuf>,

    /// MongoDB URI of the first server
    #[arg(short = 'u', long, env = "MDBEXPORTER_MONGODB_URI")]
    pub uri: Option<String>,

    /// Log level or filter directive
    #[arg(short = 'l', long, env = "MDBEXPORTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[arg(short = 'e', long, env = "MDBEXPORTER_LOG_ENCODING", value_enum)]
    pub log_encoding: Option<LogEncoding>,

    /// Address to listen on, e.g. :9412
    #[arg(short = 'b', long, env = "MDBEXPORTER_BIND")]
    pub bind: Option<String>,

    /// Path the metrics are served on
    #[arg(short = 'p', long, env = "MDBEXPORTER_METRICSPATH")]
    pub path: Option<String>,

    /// Upper bound for a single aggregation, e.g. 10s; a bare number is seconds
    #[arg(
        short = 't',
        long,
        env = "MDBEXPORTER_MONGODB_QUERY_TIMEOUT",
        value_parser = parse_timeout
    )]
    pub query_timeout: Option<Duration>,
}

/// Whole seconds or a humantime duration
fn parse_timeout(value: &str) -> Result<Duration, humantime::DurationError> {
    match value.trim().parse::<u64>() {
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(_) => humantime::parse_duration(value),
    }
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            file: self.file.clone(),
            uri: self.uri.clone(),
            log_level: self.log_level.clone(),
            log_encoding: self.log_encoding,
            bind: self.bind.clone(),
            metrics_path: self.path.clone(),
            query_timeout: self.query_timeout,
        }
    }
}
