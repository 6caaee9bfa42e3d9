//! RSVP response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Rsvp {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub guest_name: String,
    pub will_attend: bool,
    pub plus_one_attending: bool,
    pub message: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub dietary_requirements: Option<String>,
    pub song_request: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Response submitted from the public invitation page.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRsvpRequest {
    #[validate(length(min = 1, max = 120, message = "guest_name must be 1-120 characters"))]
    pub guest_name: String,

    pub will_attend: bool,

    #[serde(default)]
    pub plus_one_attending: bool,

    #[validate(length(max = 1000, message = "message must be at most 1000 characters"))]
    pub message: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 300))]
    pub dietary_requirements: Option<String>,

    #[validate(length(max = 200))]
    pub song_request: Option<String>,
}

impl CreateRsvpRequest {
    /// A declining guest cannot bring a plus-one.
    pub fn normalized(mut self) -> Self {
        if !self.will_attend {
            self.plus_one_attending = false;
        }
        self.guest_name = self.guest_name.trim().to_string();
        self
    }
}

/// Aggregate counts for an invitation's responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RsvpSummary {
    pub total: i64,
    pub attending: i64,
    pub declining: i64,
    pub plus_ones: i64,
}

impl RsvpSummary {
    /// Headcount including plus-ones.
    pub fn expected_guests(&self) -> i64 {
        self.attending + self.plus_ones
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRsvpsResponse {
    pub data: Vec<Rsvp>,
    pub summary: RsvpSummary,
}
