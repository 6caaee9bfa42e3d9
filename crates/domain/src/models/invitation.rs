//! Invitation domain models.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Built-in template used when an invitation names none.
pub const DEFAULT_TEMPLATE_ID: &str = "classic";

/// A wedding invitation owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub groom_name: String,
    pub bride_name: String,
    pub wedding_date: NaiveDate,
    pub wedding_time: Option<NaiveTime>,
    pub venue: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub custom_message: Option<String>,
    pub template_id: String,
    pub custom_template_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub rsvp_deadline: Option<NaiveDate>,
    pub is_active: bool,
    pub slug: String,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Whether RSVPs are still accepted on `today`.
    pub fn accepts_rsvp_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.rsvp_deadline.map_or(true, |deadline| today <= deadline)
    }
}

/// Request to create an invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[validate(length(min = 1, max = 100, message = "groom_name must be 1-100 characters"))]
    pub groom_name: String,

    #[validate(length(min = 1, max = 100, message = "bride_name must be 1-100 characters"))]
    pub bride_name: String,

    pub wedding_date: NaiveDate,

    pub wedding_time: Option<NaiveTime>,

    #[validate(length(min = 1, max = 200, message = "venue must be 1-200 characters"))]
    pub venue: String,

    #[validate(length(max = 300, message = "address must be at most 300 characters"))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub state: Option<String>,

    #[validate(length(max = 20))]
    pub zip_code: Option<String>,

    #[validate(length(max = 2000, message = "custom_message must be at most 2000 characters"))]
    pub custom_message: Option<String>,

    /// Built-in template id (`classic`, `modern`, ...). Defaults to `classic`.
    #[validate(custom(function = "crate::models::invitation::validate_template_id"))]
    pub template_id: Option<String>,

    pub custom_template_id: Option<Uuid>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,

    pub rsvp_deadline: Option<NaiveDate>,
}

/// Request to update an invitation. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateInvitationRequest {
    #[validate(length(min = 1, max = 100, message = "groom_name must be 1-100 characters"))]
    pub groom_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "bride_name must be 1-100 characters"))]
    pub bride_name: Option<String>,

    pub wedding_date: Option<NaiveDate>,

    pub wedding_time: Option<NaiveTime>,

    #[validate(length(min = 1, max = 200, message = "venue must be 1-200 characters"))]
    pub venue: Option<String>,

    #[validate(length(max = 300))]
    pub address: Option<String>,

    #[validate(length(max = 100))]
    pub city: Option<String>,

    #[validate(length(max = 100))]
    pub state: Option<String>,

    #[validate(length(max = 20))]
    pub zip_code: Option<String>,

    #[validate(length(max = 2000))]
    pub custom_message: Option<String>,

    #[validate(custom(function = "crate::models::invitation::validate_template_id"))]
    pub template_id: Option<String>,

    pub custom_template_id: Option<Uuid>,

    #[validate(url(message = "image_url must be a valid URL"))]
    pub image_url: Option<String>,

    pub rsvp_deadline: Option<NaiveDate>,

    pub is_active: Option<bool>,
}

/// Accepts only the built-in layout template ids.
pub fn validate_template_id(value: &str) -> Result<(), validator::ValidationError> {
    if super::template::LayoutStyle::from_template_id(value).is_some() {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("template_id");
        err.message = Some("template_id must be one of classic, modern, elegant, rustic, luxury".into());
        Err(err)
    }
}

/// Paginated invitation listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListInvitationsResponse {
    pub data: Vec<Invitation>,
    pub next_cursor: Option<String>,
}

/// What anonymous visitors of the shareable page can see.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PublicInvitation {
    pub slug: String,
    pub groom_name: String,
    pub bride_name: String,
    pub wedding_date: NaiveDate,
    pub wedding_time: Option<NaiveTime>,
    pub venue: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub custom_message: Option<String>,
    pub image_url: Option<String>,
    pub rsvp_deadline: Option<NaiveDate>,
    pub rsvp_open: bool,
    pub config: super::template::TemplateConfig,
}

impl PublicInvitation {
    pub fn new(invitation: &Invitation, config: super::template::TemplateConfig, today: NaiveDate) -> Self {
        Self {
            slug: invitation.slug.clone(),
            groom_name: invitation.groom_name.clone(),
            bride_name: invitation.bride_name.clone(),
            wedding_date: invitation.wedding_date,
            wedding_time: invitation.wedding_time,
            venue: invitation.venue.clone(),
            address: invitation.address.clone(),
            city: invitation.city.clone(),
            custom_message: invitation.custom_message.clone(),
            image_url: invitation.image_url.clone(),
            rsvp_deadline: invitation.rsvp_deadline,
            rsvp_open: invitation.accepts_rsvp_on(today),
            config,
        }
    }

    /// Text content for the rendered page.
    pub fn content(&self) -> InvitationDraft {
        InvitationDraft {
            template_name: String::new(),
            groom_name: self.groom_name.clone(),
            bride_name: self.bride_name.clone(),
            wedding_date: self.wedding_date.format("%d %B %Y").to_string(),
            wedding_time: self
                .wedding_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            venue: self.venue.clone(),
            address: [self.address.as_deref(), self.city.as_deref()]
                .into_iter()
                .flatten()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            custom_message: self.custom_message.clone().unwrap_or_default(),
        }
    }
}

/// Free-text invitation content edited next to the style configuration.
///
/// Dates and times are display text here; nothing is parsed until an
/// invitation is created from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case", default)]
pub struct InvitationDraft {
    #[validate(length(max = 120))]
    pub template_name: String,
    #[validate(length(max = 100))]
    pub groom_name: String,
    #[validate(length(max = 100))]
    pub bride_name: String,
    #[validate(length(max = 60))]
    pub wedding_date: String,
    #[validate(length(max = 30))]
    pub wedding_time: String,
    #[validate(length(max = 200))]
    pub venue: String,
    #[validate(length(max = 300))]
    pub address: String,
    #[validate(length(max = 2000))]
    pub custom_message: String,
}

impl Default for InvitationDraft {
    fn default() -> Self {
        Self {
            template_name: String::new(),
            groom_name: "Jahongir".to_string(),
            bride_name: "Sarvinoz".to_string(),
            wedding_date: "15 June 2024".to_string(),
            wedding_time: "16:00".to_string(),
            venue: "Atirgul Bog'i".to_string(),
            address: "Tashkent, Yunusobod district".to_string(),
            custom_message: "Our hearts are full of joy. We would be honored to celebrate our \
                             wedding day with you."
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    TemplateName,
    GroomName,
    BrideName,
    WeddingDate,
    WeddingTime,
    Venue,
    Address,
    CustomMessage,
}

impl InvitationDraft {
    pub fn set(&mut self, field: DraftField, value: String) {
        let slot = match field {
            DraftField::TemplateName => &mut self.template_name,
            DraftField::GroomName => &mut self.groom_name,
            DraftField::BrideName => &mut self.bride_name,
            DraftField::WeddingDate => &mut self.wedding_date,
            DraftField::WeddingTime => &mut self.wedding_time,
            DraftField::Venue => &mut self.venue,
            DraftField::Address => &mut self.address,
            DraftField::CustomMessage => &mut self.custom_message,
        };
        *slot = value;
    }
}
