//! Configuration loading utilities
//!
//! Precedence, highest first: command line flags, environment variables, the
//! configuration file, built-in defaults. Flags and their environment
//! variables are both handled by clap and arrive here as [`Overrides`].

use super::models::*;
use super::Config;
use crate::utils::error::Result;
use serde::{Deserialize, Deserializer};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "MDBEXPORTER_CONFIG";

/// Locations searched when no configuration file is given
pub const CONFIG_SEARCH_PATHS: [&str; 3] = [
    "~/.mongodb_query_exporter/config.yaml",
    "/etc/mongodb-query-exporter/config.yaml",
    "/etc/mongodb_query_exporter/config.yaml",
];

/// Values set on the command line or through their environment variables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub file: Option<PathBuf>,
    /// URI of the first server
    pub uri: Option<String>,
    pub log_level: Option<String>,
    pub log_encoding: Option<LogEncoding>,
    pub bind: Option<String>,
    pub metrics_path: Option<String>,
    pub query_timeout: Option<Duration>,
}

impl Config {
    /// Resolve the effective configuration from every source
    pub async fn load(overrides: &Overrides) -> Result<Self> {
        let mut config = match find_config_file(overrides.file.as_deref(), |name| {
            env::var(name).ok()
        }) {
            Some(path) => Self::from_file(&path).await?,
            None => {
                info!("No configuration file found, using defaults");
                Self::default()
            }
        };

        config.ensure_server();
        config.apply_env(|name| env::var(name).ok());
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Expand variables in server URIs and apply per-server URI variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (index, server) in self.servers.iter_mut().enumerate() {
            let variable = format!("MDBEXPORTER_SERVER_{}_MONGODB_URI", index);
            if let Some(uri) = lookup(&variable) {
                debug!(server = index, "server uri taken from {}", variable);
                server.uri = uri;
            }
            server.uri = expand_with(&server.uri, &lookup);
        }
    }

    /// Apply command line values on top of the current configuration
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(uri) = &overrides.uri {
            self.ensure_server();
            if let Some(first) = self.servers.first_mut() {
                first.uri = uri.clone();
            }
        }
        if let Some(level) = &overrides.log_level {
            self.log.level = level.clone();
        }
        if let Some(encoding) = overrides.log_encoding {
            self.log.encoding = encoding;
        }
        if let Some(bind) = &overrides.bind {
            self.bind = bind.clone();
        }
        if let Some(path) = &overrides.metrics_path {
            self.metrics_path = path.clone();
        }
        if let Some(timeout) = overrides.query_timeout {
            self.global.query_timeout = timeout;
        }
    }
}

/// The configuration file to read, if any.
///
/// An explicit path wins, then `MDBEXPORTER_CONFIG`, then the first existing
/// search path.
pub fn find_config_file<F>(explicit: Option<&Path>, lookup: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = lookup(CONFIG_ENV).filter(|path| !path.is_empty()) {
        return Some(PathBuf::from(path));
    }

    let home = lookup("HOME");
    CONFIG_SEARCH_PATHS
        .iter()
        .filter_map(|candidate| match candidate.strip_prefix("~/") {
            Some(rest) => home.as_ref().map(|home| Path::new(home).join(rest)),
            None => Some(PathBuf::from(candidate)),
        })
        .find(|path| path.is_file())
}

/// Expand `${VAR}` and `$VAR` from the process environment
pub fn expand_env_vars(input: &str) -> String {
    expand_with(input, |name| env::var(name).ok())
}

/// Expand `${VAR}` and `$VAR` using `lookup`; unset variables expand to nothing
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('$') {
        result.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        if name.is_empty() {
            result.push('$');
            rest = after;
        } else {
            result.push_str(&lookup(name).unwrap_or_default());
            rest = &after[consumed..];
        }
    }

    result.push_str(rest);
    result
}

/// Accept the version as a YAML number (`3.0`) or string (`"3.0"`)
pub(super) fn deserialize_version<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Version {
        Number(f64),
        Text(String),
    }

    Ok(Option::<Version>::deserialize(deserializer)?.map(|version| match version {
        Version::Number(number) if number.fract() == 0.0 => format!("{:.1}", number),
        Version::Number(number) => number.to_string(),
        Version::Text(text) => text,
    }))
}
