//! Integration tests for mongodb-query-exporter
//!
//! These tests drive the collector through its public API with an in-memory
//! driver in place of MongoDB.

pub mod config_tests;
pub mod http_tests;
