//! RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::{Rsvp, RsvpSummary};

#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
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

impl From<RsvpEntity> for Rsvp {
    fn from(entity: RsvpEntity) -> Self {
        Self {
            id: entity.id,
            invitation_id: entity.invitation_id,
            guest_name: entity.guest_name,
            will_attend: entity.will_attend,
            plus_one_attending: entity.plus_one_attending,
            message: entity.message,
            email: entity.email,
            phone: entity.phone,
            dietary_requirements: entity.dietary_requirements,
            song_request: entity.song_request,
            created_at: entity.created_at,
        }
    }
}

/// Aggregate row for an invitation's responses.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct RsvpSummaryEntity {
    pub total: i64,
    pub attending: i64,
    pub declining: i64,
    pub plus_ones: i64,
}

impl From<RsvpSummaryEntity> for RsvpSummary {
    fn from(entity: RsvpSummaryEntity) -> Self {
        Self {
            total: entity.total,
            attending: entity.attending,
            declining: entity.declining,
            plus_ones: entity.plus_ones,
        }
    }
}
