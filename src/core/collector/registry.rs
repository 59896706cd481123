//! Registry of target servers

use crate::core::driver::Driver;
use crate::utils::error::{ExporterError, Result};
use std::fmt;
use std::sync::Arc;

/// A named database connection aggregations run against
pub struct Server {
    name: Arc<str>,
    driver: Arc<dyn Driver>,
}

impl Server {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn shared_name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }

    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.driver
    }
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server").field("name", &self.name).finish()
    }
}

/// Servers in registration order; names are unique
#[derive(Debug, Default)]
pub struct ServerRegistry {
    servers: Vec<Arc<Server>>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, driver: Arc<dyn Driver>) -> Result<()> {
        let name = name.into();
        if self.servers.iter().any(|server| *server.name == *name) {
            return Err(ExporterError::DuplicateServer(name));
        }

        self.servers.push(Arc::new(Server {
            name: name.into(),
            driver,
        }));
        Ok(())
    }

    /// Servers matching `names`, or every server when `names` is empty.
    ///
    /// Unknown names are skipped; the result keeps registration order.
    pub fn resolve(&self, names: &[String]) -> Vec<Arc<Server>> {
        self.servers
            .iter()
            .filter(|server| names.is_empty() || names.iter().any(|name| **name == *server.name))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }
}
