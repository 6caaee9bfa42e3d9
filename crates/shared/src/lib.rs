//! Shared utilities and common types for the wedding invitation backend.
//!
//! This crate provides common functionality used across all other crates:
//! - JWT validation for tokens issued by the auth provider
//! - Cursor pagination helpers
//! - Invitation slug generation
//! - Common validation logic

pub mod jwt;
pub mod pagination;
pub mod slug;
pub mod validation;
