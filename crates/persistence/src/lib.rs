//! Persistence layer for the wedding invitation service.
//!
//! This crate contains:
//! - Database connection management and schema provisioning
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - The file-backed local store used when the database is unavailable

pub mod db;
pub mod entities;
pub mod local_store;
pub mod metrics;
pub mod repositories;
pub mod schema;
