//! Invitation management routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::invitation::{
    CreateInvitationRequest, Invitation, ListInvitationsResponse, UpdateInvitationRequest,
};
use persistence::repositories::{CustomTemplateRepository, InvitationRepository};
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use super::profiles::ensure_profile;
use super::{paginate, PageQuery};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Rejects custom template ids the caller can neither own nor see publicly.
async fn check_custom_template(
    state: &AppState,
    user_id: Uuid,
    template_id: Option<Uuid>,
) -> Result<(), ApiError> {
    let Some(template_id) = template_id else {
        return Ok(());
    };
    CustomTemplateRepository::new(state.pool.clone())
        .find_visible(template_id, user_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| ApiError::Validation("custom_template_id does not exist".to_string()))
}

/// Bumps a template's usage counter. The invitation already exists at this
/// point, so a failure is only logged.
async fn count_template_usage(state: &AppState, template_id: Uuid) {
    if let Err(e) = CustomTemplateRepository::new(state.pool.clone())
        .increment_usage(template_id)
        .await
    {
        warn!(template_id = %template_id, error = %e, "Failed to count template usage");
    }
}

/// POST /api/v1/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<Invitation>), ApiError> {
    request.validate()?;
    ensure_profile(&state, &user_auth).await?;
    check_custom_template(&state, user_auth.user_id, request.custom_template_id).await?;

    let invitation: Invitation = InvitationRepository::new(state.pool.clone())
        .create(user_auth.user_id, &request)
        .await?
        .into();

    if let Some(template_id) = invitation.custom_template_id {
        count_template_usage(&state, template_id).await;
    }

    info!(
        invitation_id = %invitation.id,
        slug = %invitation.slug,
        user_id = %user_auth.user_id,
        "Invitation created"
    );
    Ok((StatusCode::CREATED, Json(invitation)))
}

/// GET /api/v1/invitations
pub async fn list_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let (before, limit) = query.bounds()?;
    let rows = InvitationRepository::new(state.pool.clone())
        .list_for_user(user_auth.user_id, before, limit + 1)
        .await?;

    let (rows, next_cursor) = paginate(rows, limit, |i| (i.created_at, i.id));
    Ok(Json(ListInvitationsResponse {
        data: rows.into_iter().map(Invitation::from).collect(),
        next_cursor,
    }))
}

/// GET /api/v1/invitations/:invitation_id
pub async fn get_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = InvitationRepository::new(state.pool.clone())
        .find_owned(invitation_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;
    Ok(Json(invitation.into()))
}

/// PUT /api/v1/invitations/:invitation_id
pub async fn update_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
    Json(request): Json<UpdateInvitationRequest>,
) -> Result<Json<Invitation>, ApiError> {
    request.validate()?;
    check_custom_template(&state, user_auth.user_id, request.custom_template_id).await?;

    let invitation = InvitationRepository::new(state.pool.clone())
        .update(invitation_id, user_auth.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    info!(invitation_id = %invitation_id, user_id = %user_auth.user_id, "Invitation updated");
    Ok(Json(invitation.into()))
}

/// DELETE /api/v1/invitations/:invitation_id
///
/// Guests and RSVPs go with it.
pub async fn delete_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = InvitationRepository::new(state.pool.clone())
        .delete(invitation_id, user_auth.user_id)
        .await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Invitation not found".to_string()));
    }

    info!(invitation_id = %invitation_id, user_id = %user_auth.user_id, "Invitation deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;

    fn auth() -> UserAuth {
        UserAuth {
            user_id: Uuid::new_v4(),
            email: None,
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_validates_before_database() {
        let request: CreateInvitationRequest = serde_json::from_value(serde_json::json!({
            "groom_name": "",
            "bride_name": "Sarvinoz",
            "wedding_date": "2024-06-15",
            "venue": "Atirgul Bog'i",
        }))
        .unwrap();
        let result = create_invitation(State(test_state()), auth(), Json(request)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_usage_count_failure_is_not_an_error() {
        // Database unreachable: the counter update fails and is swallowed.
        count_template_usage(&test_state(), Uuid::new_v4()).await;
    }

    #[tokio::test]
    async fn test_unknown_template_id_rejected() {
        let request = UpdateInvitationRequest {
            template_id: Some("baroque".to_string()),
            ..Default::default()
        };
        let result =
            update_invitation(State(test_state()), auth(), Path(Uuid::new_v4()), Json(request))
                .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_bad_cursor_rejected() {
        let query = PageQuery {
            cursor: Some("%%%".to_string()),
            limit: None,
        };
        let result = list_invitations(State(test_state()), auth(), Query(query)).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
