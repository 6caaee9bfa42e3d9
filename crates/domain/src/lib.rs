//! Domain layer for the wedding invitation service.
//!
//! This crate contains:
//! - Domain models (Profile, CustomTemplate, Invitation, Guest, Rsvp)
//! - The template editor, preview rendering and template save services
//! - Storage traits implemented by the persistence layer

pub mod models;
pub mod services;
