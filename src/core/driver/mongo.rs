//! MongoDB implementation of the driver

use super::{ChangeEvent, ChangeEventCursor, ChangeNamespace, DocumentCursor, Driver};
use crate::utils::error::DriverError;
use async_trait::async_trait;
use bson::{Document, doc};
use futures::{StreamExt, TryStreamExt};
use mongodb::Client;
use mongodb::change_stream::event::ChangeStreamEvent;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use tracing::debug;

/// Driver backed by the official MongoDB client
#[derive(Debug, Clone)]
pub struct MongoDbDriver {
    client: Client,
    hosts: Vec<String>,
}

impl MongoDbDriver {
    /// Parse the connection string and create the client.
    ///
    /// The client connects lazily; use [`Driver::ping`] to force a round trip.
    pub async fn connect(uri: &str, max_connections: Option<u32>) -> Result<Self, DriverError> {
        let mut options = ClientOptions::parse(uri).await?;
        if let Some(max) = max_connections {
            options.max_pool_size = Some(max);
        }

        let hosts: Vec<String> = options.hosts.iter().map(|host| host.to_string()).collect();
        debug!(hosts = ?hosts, "creating mongodb client");

        let client = Client::with_options(options)?;
        Ok(Self { client, hosts })
    }

    /// Hosts taken from the connection string, in declaration order
    pub fn hosts(&self) -> &[String] {
        &self.hosts
    }
}

#[async_trait]
impl Driver for MongoDbDriver {
    async fn ping(&self) -> Result<(), DriverError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    async fn aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<DocumentCursor, DriverError> {
        let cursor = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;

        Ok(cursor.map_err(DriverError::from).boxed())
    }

    async fn watch(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<ChangeEventCursor, DriverError> {
        let stream = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .watch()
            .pipeline(pipeline)
            .await?;

        Ok(stream
            .map_ok(|event: ChangeStreamEvent<Document>| ChangeEvent {
                namespace: event.ns.map(|ns| ChangeNamespace {
                    database: ns.db,
                    collection: ns.coll,
                }),
            })
            .map_err(DriverError::from)
            .boxed())
    }
}

impl From<mongodb::error::Error> for DriverError {
    fn from(err: mongodb::error::Error) -> Self {
        if matches!(err.kind.as_ref(), ErrorKind::BsonDeserialization(_)) {
            DriverError::decode(err.to_string())
        } else {
            DriverError::backend(err.to_string())
        }
    }
}
