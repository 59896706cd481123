//! Logging configuration

use super::*;
use crate::utils::error::{ExporterError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogEncoding {
    #[default]
    Json,
    Console,
}

impl FromStr for LogEncoding {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Self::Json),
            "console" => Ok(Self::Console),
            other => Err(ExporterError::config(format!(
                "unknown log encoding {:?}, expected json or console",
                other
            ))),
        }
    }
}

impl fmt::Display for LogEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Console => f.write_str("console"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default)]
    pub encoding: LogEncoding,
    /// Level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Human readable, colored output
    #[serde(default)]
    pub development: bool,
    /// Omit source file and line
    #[serde(default)]
    pub disable_caller: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            encoding: LogEncoding::default(),
            level: default_log_level(),
            development: false,
            disable_caller: false,
        }
    }
}
