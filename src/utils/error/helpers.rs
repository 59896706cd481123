//! Helper functions for creating specific error types

use super::types::{DriverError, ExporterError};

impl ExporterError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    /// Whether the error was produced while turning a document into a sample
    pub fn is_synthesis(&self) -> bool {
        matches!(
            self,
            Self::ValueNotFound { .. }
                | Self::ValueNotNumeric { .. }
                | Self::LabelNotFound { .. }
                | Self::LabelNotString { .. }
        )
    }
}

impl DriverError {
    pub fn backend<S: Into<String>>(message: S) -> Self {
        Self::Backend(message.into())
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode(message.into())
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}
