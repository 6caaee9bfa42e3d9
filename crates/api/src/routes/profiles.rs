//! Profile routes for the signed-in user.

use axum::{extract::State, Json};
use domain::models::profile::{Profile, UpdateProfileRequest};
use persistence::repositories::ProfileRepository;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Makes sure the caller has a profile row; returns it.
pub(crate) async fn ensure_profile(
    state: &AppState,
    user_auth: &UserAuth,
) -> Result<Profile, sqlx::Error> {
    ProfileRepository::new(state.pool.clone())
        .ensure(
            user_auth.user_id,
            user_auth.email.as_deref(),
            state.config.database.provision_auth_shim,
        )
        .await
        .map(Profile::from)
}

/// GET /api/v1/profiles/me
///
/// Creates the profile on first access.
pub async fn get_my_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<Profile>, ApiError> {
    Ok(Json(ensure_profile(&state, &user_auth).await?))
}

/// PUT /api/v1/profiles/me
pub async fn update_my_profile(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    request.validate()?;
    if request
        .settings
        .as_ref()
        .is_some_and(|settings| !settings.is_object())
    {
        return Err(ApiError::Validation(
            "settings must be a JSON object".to_string(),
        ));
    }

    ensure_profile(&state, &user_auth).await?;
    let profile = ProfileRepository::new(state.pool.clone())
        .update(user_auth.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))?;

    info!(user_id = %user_auth.user_id, "Profile updated");
    Ok(Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_non_object_settings_rejected_before_database() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            email: None,
            role: None,
        };
        let request = UpdateProfileRequest {
            settings: Some(serde_json::json!(["not", "an", "object"])),
            ..Default::default()
        };

        let result = update_my_profile(State(test_state()), auth, Json(request)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_invalid_avatar_url_rejected() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            email: None,
            role: None,
        };
        let request = UpdateProfileRequest {
            avatar_url: Some("not a url".to_string()),
            ..Default::default()
        };

        let result = update_my_profile(State(test_state()), auth, Json(request)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
