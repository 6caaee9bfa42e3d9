//! User profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Profile row keyed by the auth provider's user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    pub id: Uuid,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub is_active: bool,
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn display_name(&self) -> Option<String> {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 80))]
    pub first_name: Option<String>,

    #[validate(length(max = 80))]
    pub last_name: Option<String>,

    #[validate(url(message = "avatar_url must be a valid URL"))]
    pub avatar_url: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[validate(length(max = 120))]
    pub company_name: Option<String>,

    pub settings: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(first: Option<&str>, last: Option<&str>) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            email: None,
            avatar_url: None,
            phone: None,
            company_name: None,
            is_active: true,
            settings: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(
            profile(Some("Sarvinoz"), Some("Karimova")).display_name().as_deref(),
            Some("Sarvinoz Karimova")
        );
        assert_eq!(profile(None, Some("Karimova")).display_name().as_deref(), Some("Karimova"));
        assert!(profile(None, None).display_name().is_none());
    }

    #[test]
    fn test_update_rejects_bad_avatar() {
        let req = UpdateProfileRequest {
            avatar_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(req.validate().is_err());
    }
}
