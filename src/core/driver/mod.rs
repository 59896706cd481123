//! Database driver abstraction
//!
//! The collector only needs a narrow capability from the database: run an
//! aggregation, open a change stream and check liveness. Cursors are plain
//! streams; advancing polls the stream, decoding happens per item and closing
//! is dropping it.

mod mongo;

pub use mongo::MongoDbDriver;

use crate::utils::error::DriverError;
use async_trait::async_trait;
use bson::Document;
use futures::stream::BoxStream;

/// One result document of an aggregation
pub type AggregationResult = Document;

/// Forward-only sequence of aggregation results
pub type DocumentCursor = BoxStream<'static, Result<AggregationResult, DriverError>>;

/// Forward-only sequence of change notifications
pub type ChangeEventCursor = BoxStream<'static, Result<ChangeEvent, DriverError>>;

/// Namespace a change notification refers to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeNamespace {
    pub database: String,
    pub collection: Option<String>,
}

/// A change notification; its content is irrelevant beyond "something changed"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeEvent {
    pub namespace: Option<ChangeNamespace>,
}

/// Database driver used by the collector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Driver: Send + Sync {
    /// Enforce a round trip to the server
    async fn ping(&self) -> Result<(), DriverError>;

    /// Run an aggregation pipeline against `database.collection`
    async fn aggregate(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<DocumentCursor, DriverError>;

    /// Open a change stream on `database.collection`
    async fn watch(
        &self,
        database: &str,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<ChangeEventCursor, DriverError>;
}
