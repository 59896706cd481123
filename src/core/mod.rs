//! Core functionality for the exporter
//!
//! This module contains the collection engine and the pieces it is built on.

pub mod cache_manager;
pub mod collector;
pub mod driver;
