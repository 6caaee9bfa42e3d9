//! Invitation entity (database row mapping).

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Invitation;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
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

impl From<InvitationEntity> for Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            groom_name: entity.groom_name,
            bride_name: entity.bride_name,
            wedding_date: entity.wedding_date,
            wedding_time: entity.wedding_time,
            venue: entity.venue,
            address: entity.address,
            city: entity.city,
            state: entity.state,
            zip_code: entity.zip_code,
            custom_message: entity.custom_message,
            template_id: entity.template_id,
            custom_template_id: entity.custom_template_id,
            image_url: entity.image_url,
            rsvp_deadline: entity.rsvp_deadline,
            is_active: entity.is_active,
            slug: entity.slug,
            view_count: entity.view_count,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
