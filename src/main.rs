//! mongodb-query-exporter - Prometheus exporter for MongoDB aggregations

#![allow(missing_docs)]

use clap::Parser;
use mongodb_query_exporter::cli::Args;
use mongodb_query_exporter::utils::logging::init_logging;
use mongodb_query_exporter::{Config, server};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result = async {
        let config = Config::load(&args.overrides()).await?;
        init_logging(&config.log)?;
        server::run_server(config).await
    }
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display keeps multi-line errors readable
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
