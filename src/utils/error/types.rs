//! Error types for the exporter

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for the exporter
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Main error type for the exporter
#[derive(Error, Debug)]
pub enum ExporterError {
    /// A server with the same name has already been registered
    #[error("server {0} is already registered")]
    DuplicateServer(String),

    /// An aggregation references servers which are not registered
    #[error("aggregation bound to servers which have not been found: {}", .0.join(", "))]
    UnknownServer(Vec<String>),

    /// The aggregation pipeline text could not be decoded
    #[error("failed to decode json aggregation pipeline: {0}")]
    PipelineParse(#[source] PipelineError),

    /// The metric template declares a kind we cannot export
    #[error(
        "failed to initialize metric {metric}: unknown metric type {kind:?} provided, only [gauge] is supported"
    )]
    UnsupportedMetricType { metric: String, kind: String },

    /// The prometheus crate rejected the metric descriptor
    #[error("failed to initialize metric {metric}: {source}")]
    InvalidDescriptor {
        metric: String,
        #[source]
        source: prometheus::Error,
    },

    /// The value field is absent from a result document
    #[error("value {field} not found in result set")]
    ValueNotFound { field: String },

    /// The value field is present but not numeric
    #[error(
        "provided value {field} taken from the aggregation result has to be a number, type {kind} given"
    )]
    ValueNotNumeric { field: String, kind: String },

    /// A declared label field is absent from a result document
    #[error("required label {label} not found in result set")]
    LabelNotFound { label: String },

    /// A declared label field is present but not a string
    #[error(
        "provided label value {label} taken from the aggregation result has to be a string, type {kind} given"
    )]
    LabelNotString { label: String, kind: String },

    /// Driver errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// The aggregation did not finish within the query timeout
    #[error("aggregation timed out after {0:?}")]
    Timeout(Duration),

    /// Several errors accumulated during one execution
    #[error(transparent)]
    Multiple(#[from] MultiError),

    /// Prometheus errors
    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),
}

/// Failure modes of the database driver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    /// Connection, command or network failures
    #[error("{0}")]
    Backend(String),

    /// A record was received but could not be decoded
    #[error("failed to decode record: {0}")]
    Decode(String),
}

/// Reasons a pipeline text is not a valid aggregation pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid extended JSON: {0}")]
    ExtendedJson(#[from] bson::extjson::de::Error),

    #[error("pipeline must be an array of stages")]
    NotAnArray,

    #[error("pipeline stage {0} is not a document")]
    StageNotADocument(usize),
}

/// Errors accumulated while an execution keeps going
#[derive(Debug, Default)]
pub struct MultiError(Vec<ExporterError>);

impl MultiError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ExporterError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[ExporterError] {
        &self.0
    }

    /// `Ok(())` when nothing was accumulated
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ExporterError::Multiple(self))
        }
    }
}

impl fmt::Display for MultiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "error" } else { "errors" };
        write!(f, "{} {} occurred", self.0.len(), noun)?;
        for error in &self.0 {
            write!(f, "; {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for MultiError {}
