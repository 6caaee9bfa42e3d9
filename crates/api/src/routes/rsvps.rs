//! RSVP listing for invitation owners.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::rsvp::{ListRsvpsResponse, Rsvp, RsvpSummary};
use persistence::repositories::{InvitationRepository, RsvpRepository};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// GET /api/v1/invitations/:invitation_id/rsvps
///
/// Newest first, with attendance totals.
pub async fn list_rsvps(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<ListRsvpsResponse>, ApiError> {
    InvitationRepository::new(state.pool.clone())
        .find_owned(invitation_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?;

    let repo = RsvpRepository::new(state.pool.clone());
    let data = repo
        .list_for_owner(invitation_id, user_auth.user_id)
        .await?
        .into_iter()
        .map(Rsvp::from)
        .collect();
    let summary = RsvpSummary::from(repo.summary(invitation_id).await?);

    Ok(Json(ListRsvpsResponse { data, summary }))
}
