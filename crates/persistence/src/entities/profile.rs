//! Profile entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::Profile;

/// Database row mapping for the profiles table.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileEntity {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub settings: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileEntity> for Profile {
    fn from(entity: ProfileEntity) -> Self {
        Self {
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            email: entity.email,
            avatar_url: entity.avatar_url,
            phone: entity.phone,
            company_name: entity.company_name,
            is_active: entity.is_active,
            settings: entity.settings.unwrap_or_else(|| serde_json::json!({})),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
