//! Guest list models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Guest {
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

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGuestRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    #[serde(default)]
    pub plus_one: bool,

    #[validate(length(max = 60))]
    pub group_name: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    #[serde(default)]
    pub is_vip: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateGuestRequest {
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_phone"))]
    pub phone: Option<String>,

    pub plus_one: Option<bool>,

    #[validate(length(max = 60))]
    pub group_name: Option<String>,

    #[validate(length(max = 500))]
    pub notes: Option<String>,

    pub is_vip: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListGuestsResponse {
    pub data: Vec<Guest>,
    pub total: usize,
}
