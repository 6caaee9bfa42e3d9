//! Guest entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Guest;

#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub plus_one: bool,
    pub group_name: Option<String>,
    pub notes: Option<String>,
    pub is_vip: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuestEntity> for Guest {
    fn from(entity: GuestEntity) -> Self {
        Self {
            id: entity.id,
            invitation_id: entity.invitation_id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            plus_one: entity.plus_one,
            group_name: entity.group_name,
            notes: entity.notes,
            is_vip: entity.is_vip,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
