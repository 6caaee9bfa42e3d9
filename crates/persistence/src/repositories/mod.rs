//! Repository implementations for database operations.

pub mod custom_template;
pub mod guest;
pub mod invitation;
pub mod profile;
pub mod rsvp;

pub use custom_template::CustomTemplateRepository;
pub use guest::GuestRepository;
pub use invitation::InvitationRepository;
pub use profile::ProfileRepository;
pub use rsvp::RsvpRepository;
