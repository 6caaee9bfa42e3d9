//! Template editor routes: live preview and save.
//!
//! The editor is stateless on the server. Each request carries the current
//! config and draft plus the commands to apply, and gets the resulting editor
//! state back.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use domain::models::invitation::InvitationDraft;
use domain::models::template::{CustomTemplate, TemplateConfig};
use domain::services::editor::{EditorCommand, TemplateEditor};
use domain::services::preview::{render_invitation_html, render_page, PreviewDevice};
use domain::services::template_save::SaveOutcome;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use super::profiles::ensure_profile;
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalUserAuth;
use crate::middleware::metrics::{record_template_save_failed, record_template_saved};

/// Editor state sent by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EditorRequest {
    pub config: TemplateConfig,
    pub draft: InvitationDraft,
    pub commands: Vec<EditorCommand>,
    pub device: Option<PreviewDevice>,
}

impl EditorRequest {
    /// Replays the commands on top of the submitted state.
    fn into_editor(self) -> Result<TemplateEditor, ApiError> {
        let mut editor = TemplateEditor::with_state(self.config, self.draft);
        if let Some(device) = self.device {
            editor.preview_device = device;
        }
        editor.apply_all(self.commands)?;
        editor.config.validate()?;
        editor.draft.validate()?;
        Ok(editor)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    /// `html` returns a full page instead of JSON.
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub editor: TemplateEditor,
    pub html: String,
}

/// Renders the invitation with the edited config.
///
/// POST /api/v1/editor/preview
pub async fn preview(
    Query(query): Query<PreviewQuery>,
    Json(request): Json<EditorRequest>,
) -> Result<Response, ApiError> {
    let editor = request.into_editor()?;

    if query.format.as_deref() == Some("html") {
        let title = match editor.draft.template_name.trim() {
            "" => "Invitation preview",
            name => name,
        };
        let page = render_page(title, &editor.config, &editor.draft, editor.preview_device);
        return Ok(Html(page).into_response());
    }

    let html = render_invitation_html(&editor.config, &editor.draft, editor.preview_device);
    Ok(Json(PreviewResponse { editor, html }).into_response())
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub editor: TemplateEditor,
    pub is_local: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<CustomTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_id: Option<String>,
    pub message: String,
    /// How long the client shows the status before leaving the editor.
    pub redirect_delay_ms: u64,
}

impl SaveResponse {
    fn new(editor: TemplateEditor, outcome: SaveOutcome) -> Self {
        let message = outcome.message().to_string();
        let redirect_delay_ms = outcome.redirect_delay_ms();
        let (template, local_id) = match outcome {
            SaveOutcome::Remote { template } => (Some(template), None),
            SaveOutcome::Local { record } => (None, Some(record.id)),
        };
        Self {
            editor,
            is_local: local_id.is_some(),
            template,
            local_id,
            message,
            redirect_delay_ms,
        }
    }
}

/// Saves the edited template.
///
/// POST /api/v1/editor/save
///
/// Responds 201 when the database stored the template and 202 when it was
/// kept locally for a later sync. Signing in is required.
pub async fn save(
    State(state): State<AppState>,
    OptionalUserAuth(user_auth): OptionalUserAuth,
    Json(request): Json<EditorRequest>,
) -> Result<(StatusCode, Json<SaveResponse>), ApiError> {
    let mut editor = request.into_editor()?;
    let payload = editor.begin_save(
        user_auth.as_ref().map(|a| a.user_id),
        Utc::now().date_naive(),
    )?;

    if let Some(auth) = &user_auth {
        // A missing profile only matters to the remote insert, which falls back anyway.
        if let Err(e) = ensure_profile(&state, auth).await {
            warn!(user_id = %auth.user_id, error = %e, "Could not ensure profile before save");
        }
    }

    let outcome = match state.saver.save(payload, editor.draft.clone()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            record_template_save_failed();
            editor.fail_save(e.to_string());
            return Err(e.into());
        }
    };

    record_template_saved(&outcome);
    editor.finish_save(&outcome, Utc::now());
    info!(
        user_id = ?user_auth.as_ref().map(|a| a.user_id),
        is_local = outcome.is_local(),
        "Template saved from editor"
    );

    let status = if outcome.is_local() {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(SaveResponse::new(editor, outcome))))
}
