//! Unauthenticated routes used by invited guests.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
    Json,
};
use chrono::Utc;
use domain::models::invitation::{Invitation, PublicInvitation};
use domain::models::rsvp::{CreateRsvpRequest, Rsvp};
use domain::models::template::{CustomTemplate, LayoutStyle, TemplateConfig};
use domain::services::preview::{render_page, PreviewDevice};
use persistence::repositories::{CustomTemplateRepository, InvitationRepository, RsvpRepository};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::metrics::{record_invitation_viewed, record_rsvp_submitted};

/// Falls back to the built-in style when the custom template is gone.
async fn resolve_config(
    state: &AppState,
    invitation: &Invitation,
) -> Result<TemplateConfig, ApiError> {
    if let Some(template_id) = invitation.custom_template_id {
        let template = CustomTemplateRepository::new(state.pool.clone())
            .find_for_render(template_id)
            .await?;
        if let Some(template) = template {
            return Ok(CustomTemplate::from(template).config);
        }
        warn!(
            invitation_id = %invitation.id,
            template_id = %template_id,
            "Custom template unavailable, using built-in style"
        );
    }

    let style =
        LayoutStyle::from_template_id(&invitation.template_id).unwrap_or(LayoutStyle::Classic);
    Ok(TemplateConfig::for_style(style))
}

async fn find_by_slug(state: &AppState, slug: &str) -> Result<Invitation, ApiError> {
    InvitationRepository::new(state.pool.clone())
        .find_public_by_slug(slug)
        .await?
        .map(Invitation::from)
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))
}

/// GET /api/v1/public/invitations/:slug
pub async fn get_public_invitation(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicInvitation>, ApiError> {
    let invitation = find_by_slug(&state, &slug).await?;
    let config = resolve_config(&state, &invitation).await?;
    Ok(Json(PublicInvitation::new(
        &invitation,
        config,
        Utc::now().date_naive(),
    )))
}

/// Records a guest's response.
///
/// POST /api/v1/public/invitations/:slug/rsvps
///
/// Returns 409 once the RSVP deadline has passed.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<CreateRsvpRequest>,
) -> Result<(StatusCode, Json<Rsvp>), ApiError> {
    let request = request.normalized();
    request.validate()?;

    let invitation = find_by_slug(&state, &slug).await?;
    if !invitation.accepts_rsvp_on(Utc::now().date_naive()) {
        return Err(ApiError::Conflict(
            "This invitation is no longer accepting responses".to_string(),
        ));
    }

    let rsvp: Rsvp = RsvpRepository::new(state.pool.clone())
        .create_public(invitation.id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?
        .into();

    record_rsvp_submitted(rsvp.will_attend);
    info!(
        invitation_id = %invitation.id,
        rsvp_id = %rsvp.id,
        will_attend = rsvp.will_attend,
        "RSVP received"
    );
    Ok((StatusCode::CREATED, Json(rsvp)))
}

#[derive(Debug, Default, Deserialize)]
pub struct PageViewQuery {
    pub device: Option<PreviewDevice>,
}

/// The shareable invitation page.
///
/// GET /i/:slug
pub async fn invitation_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PageViewQuery>,
) -> Result<Html<String>, ApiError> {
    let invitation = find_by_slug(&state, &slug).await?;
    let config = resolve_config(&state, &invitation).await?;
    let public = PublicInvitation::new(&invitation, config, Utc::now().date_naive());

    if let Err(e) = InvitationRepository::new(state.pool.clone())
        .increment_view_count(invitation.id)
        .await
    {
        warn!(invitation_id = %invitation.id, error = %e, "Failed to count invitation view");
    }
    record_invitation_viewed();

    let title = format!("{} & {}", public.groom_name, public.bride_name);
    Ok(Html(render_page(
        &title,
        &public.config,
        &public.content(),
        query.device.unwrap_or_default(),
    )))
}
