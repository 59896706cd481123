//! End-to-end tests for mongodb-query-exporter
//!
//! These tests need a running MongoDB deployment.
//! Run with: cargo test -- --ignored
//!
//! Required environment variables:
//! - MDBEXPORTER_TEST_MONGODB_URI: deployment to run against
