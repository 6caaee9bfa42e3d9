//! Domain models for the invitation service.

pub mod guest;
pub mod invitation;
pub mod profile;
pub mod rsvp;
pub mod setup;
pub mod template;

pub use guest::Guest;
pub use invitation::{Invitation, InvitationDraft, PublicInvitation};
pub use profile::Profile;
pub use rsvp::{Rsvp, RsvpSummary};
pub use setup::{DatabaseStatus, SetupReport, StepOutcome, StepStatus};
pub use template::{CustomTemplate, NewCustomTemplate, TemplateConfig};
