//! MongoDB server configuration

use super::*;
use serde::{Deserialize, Serialize};

/// A MongoDB deployment aggregations can run against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Unique name; derived from the URI hosts when empty
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_uri")]
    pub uri: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: default_server_name(),
            uri: default_uri(),
        }
    }
}

impl ServerConfig {
    /// Name to register the server under, given the hosts of its URI
    pub fn resolved_name(&self, hosts: &[String]) -> String {
        if self.name.is_empty() {
            hosts.join(",")
        } else {
            self.name.clone()
        }
    }
}
