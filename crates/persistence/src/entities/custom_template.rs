//! Custom template entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::template::{CustomTemplate, TemplateConfig};

/// Database row mapping for the custom_templates table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomTemplateEntity {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub is_public: bool,
    pub is_featured: bool,
    pub config: serde_json::Value,
    pub custom_css: Option<String>,
    pub preview_image: Option<String>,
    pub usage_count: i32,
    pub is_active: bool,
    pub tags: Vec<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reads a stored config, falling back to the default config when the row is
/// unreadable or fails validation.
pub fn config_from_json(id: Uuid, value: serde_json::Value) -> TemplateConfig {
    TemplateConfig::from_stored(value).unwrap_or_else(|e| {
        tracing::warn!(template_id = %id, error = %e, "Rejected stored template config, using defaults");
        TemplateConfig::default()
    })
}

impl From<CustomTemplateEntity> for CustomTemplate {
    fn from(entity: CustomTemplateEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            name: entity.name,
            description: entity.description,
            category: entity.category,
            is_public: entity.is_public,
            is_featured: entity.is_featured,
            config: config_from_json(entity.id, entity.config),
            custom_css: entity.custom_css,
            preview_image: entity.preview_image,
            usage_count: entity.usage_count,
            is_active: entity.is_active,
            tags: entity.tags,
            metadata: entity.metadata.unwrap_or_else(|| serde_json::json!({})),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
