//! In-memory driver
//!
//! Answers every aggregation with the scripted records and exposes a channel
//! to emit change events.

use async_trait::async_trait;
use bson::Document;
use futures::{StreamExt, stream};
use mongodb_query_exporter::core::driver::{ChangeEvent, ChangeEventCursor, DocumentCursor, Driver};
use mongodb_query_exporter::utils::error::DriverError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// One record of a scripted result
pub type Record = Result<Document, DriverError>;

/// Driver replaying scripted records
pub struct ScriptedDriver {
    records: Mutex<Vec<Record>>,
    fail_aggregate: Mutex<Option<DriverError>>,
    aggregate_calls: AtomicUsize,
    watch_calls: AtomicUsize,
    events: Mutex<Option<mpsc::Receiver<Result<ChangeEvent, DriverError>>>>,
    watched: Mutex<Vec<(String, String)>>,
}

impl ScriptedDriver {
    pub fn new(documents: Vec<Document>) -> Arc<Self> {
        Self::with_records(documents.into_iter().map(Ok).collect())
    }

    pub fn with_records(records: Vec<Record>) -> Arc<Self> {
        Arc::new(Self {
            records: Mutex::new(records),
            fail_aggregate: Mutex::new(None),
            aggregate_calls: AtomicUsize::new(0),
            watch_calls: AtomicUsize::new(0),
            events: Mutex::new(None),
            watched: Mutex::new(Vec::new()),
        })
    }

    /// Replace the records returned by the following aggregations
    pub fn set_documents(&self, documents: Vec<Document>) {
        *self.records.lock() = documents.into_iter().map(Ok).collect();
    }

    /// Make the following aggregations fail before returning a cursor
    pub fn fail_with(&self, error: DriverError) {
        *self.fail_aggregate.lock() = Some(error);
    }

    /// Let the following aggregations succeed again
    pub fn recover(&self) {
        *self.fail_aggregate.lock() = None;
    }

    /// Channel feeding the change stream opened by the next `watch`
    pub fn change_events(&self) -> mpsc::Sender<Result<ChangeEvent, DriverError>> {
        let (tx, rx) = mpsc::channel(16);
        *self.events.lock() = Some(rx);
        tx
    }

    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_calls.load(Ordering::SeqCst)
    }

    pub fn watch_calls(&self) -> usize {
        self.watch_calls.load(Ordering::SeqCst)
    }

    /// Namespaces passed to `watch`
    pub fn watched(&self) -> Vec<(String, String)> {
        self.watched.lock().clone()
    }
}

#[async_trait]
impl Driver for ScriptedDriver {
    async fn ping(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn aggregate(
        &self,
        _database: &str,
        _collection: &str,
        _pipeline: Vec<Document>,
    ) -> Result<DocumentCursor, DriverError> {
        self.aggregate_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.fail_aggregate.lock().clone() {
            return Err(error);
        }
        let records = self.records.lock().clone();
        Ok(stream::iter(records).boxed())
    }

    async fn watch(
        &self,
        database: &str,
        collection: &str,
        _pipeline: Vec<Document>,
    ) -> Result<ChangeEventCursor, DriverError> {
        self.watch_calls.fetch_add(1, Ordering::SeqCst);
        self.watched
            .lock()
            .push((database.to_string(), collection.to_string()));

        match self.events.lock().take() {
            Some(rx) => Ok(ReceiverStream::new(rx).boxed()),
            None => Err(DriverError::Backend(
                "change streams are only supported on replica sets".to_string(),
            )),
        }
    }
}
