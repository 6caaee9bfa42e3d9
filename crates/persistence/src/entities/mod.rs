//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod custom_template;
pub mod guest;
pub mod invitation;
pub mod profile;
pub mod rsvp;

pub use custom_template::CustomTemplateEntity;
pub use guest::GuestEntity;
pub use invitation::InvitationEntity;
pub use profile::ProfileEntity;
pub use rsvp::{RsvpEntity, RsvpSummaryEntity};
