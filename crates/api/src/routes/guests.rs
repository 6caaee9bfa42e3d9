//! Guest list routes, nested under an invitation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::guest::{CreateGuestRequest, Guest, ListGuestsResponse, UpdateGuestRequest};
use persistence::repositories::GuestRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

fn invitation_not_found() -> ApiError {
    ApiError::NotFound("Invitation not found".to_string())
}

/// GET /api/v1/invitations/:invitation_id/guests
///
/// VIP guests first. An invitation the caller does not own lists as empty.
pub async fn list_guests(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<ListGuestsResponse>, ApiError> {
    let guests: Vec<Guest> = GuestRepository::new(state.pool.clone())
        .list(invitation_id, user_auth.user_id)
        .await?
        .into_iter()
        .map(Guest::from)
        .collect();

    Ok(Json(ListGuestsResponse {
        total: guests.len(),
        data: guests,
    }))
}

/// POST /api/v1/invitations/:invitation_id/guests
pub async fn create_guest(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<Guest>), ApiError> {
    request.validate()?;

    let guest = GuestRepository::new(state.pool.clone())
        .create(invitation_id, user_auth.user_id, &request)
        .await?
        .ok_or_else(invitation_not_found)?;

    info!(guest_id = %guest.id, invitation_id = %invitation_id, "Guest added");
    Ok((StatusCode::CREATED, Json(guest.into())))
}

/// PUT /api/v1/invitations/:invitation_id/guests/:guest_id
pub async fn update_guest(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((invitation_id, guest_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateGuestRequest>,
) -> Result<Json<Guest>, ApiError> {
    request.validate()?;

    let guest = GuestRepository::new(state.pool.clone())
        .update(guest_id, invitation_id, user_auth.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guest not found".to_string()))?;
    Ok(Json(guest.into()))
}

/// DELETE /api/v1/invitations/:invitation_id/guests/:guest_id
pub async fn delete_guest(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((invitation_id, guest_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    let deleted = GuestRepository::new(state.pool.clone())
        .delete(guest_id, invitation_id, user_auth.user_id)
        .await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Guest not found".to_string()));
    }

    info!(guest_id = %guest_id, invitation_id = %invitation_id, "Guest removed");
    Ok(StatusCode::NO_CONTENT)
}
