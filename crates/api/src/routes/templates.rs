//! Custom template routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::template::{
    CreateTemplateRequest, CustomTemplate, ListTemplatesResponse, NewCustomTemplate,
    TemplateCatalog, UpdateTemplateRequest,
};
use domain::services::template_save::{LocalTemplateRecord, SyncReport};
use persistence::repositories::CustomTemplateRepository;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::profiles::ensure_profile;
use super::{paginate, PageQuery};
use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_template_sync;

/// Presets, fonts, layouts, animations and slider bounds for editor clients.
///
/// GET /api/v1/templates/catalog
pub async fn get_catalog() -> Json<TemplateCatalog> {
    Json(TemplateCatalog::new())
}

/// Creates a template directly in the database.
///
/// POST /api/v1/templates
///
/// Unlike the editor save there is no local fallback: failures are returned.
pub async fn create_template(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<CustomTemplate>), ApiError> {
    request.validate()?;
    ensure_profile(&state, &user_auth).await?;

    let mut payload = NewCustomTemplate::from_editor(
        user_auth.user_id,
        &request.name,
        request.config,
        chrono::Utc::now().date_naive(),
    );
    if request.description.is_some() {
        payload.description = request.description;
    }
    payload.is_public = request.is_public.unwrap_or(false);

    let template: CustomTemplate = CustomTemplateRepository::new(state.pool.clone())
        .insert(&payload)
        .await?
        .into();

    info!(
        template_id = %template.id,
        user_id = %user_auth.user_id,
        is_public = template.is_public,
        "Template created"
    );
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/v1/templates
pub async fn list_templates(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
    let (before, limit) = query.bounds()?;
    let rows = CustomTemplateRepository::new(state.pool.clone())
        .list_for_user(user_auth.user_id, before, limit + 1)
        .await?;

    let (rows, next_cursor) = paginate(rows, limit, |t| (t.created_at, t.id));
    Ok(Json(ListTemplatesResponse {
        data: rows.into_iter().map(CustomTemplate::from).collect(),
        next_cursor,
    }))
}

/// Shared templates, featured and most used first.
///
/// GET /api/v1/templates/public
pub async fn list_public_templates(
    State(state): State<AppState>,
    _user_auth: UserAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListTemplatesResponse>, ApiError> {
    let limit = shared::pagination::clamp_limit(query.limit);
    let rows = CustomTemplateRepository::new(state.pool.clone())
        .list_public(limit)
        .await?;

    Ok(Json(ListTemplatesResponse {
        data: rows.into_iter().map(CustomTemplate::from).collect(),
        next_cursor: None,
    }))
}

/// GET /api/v1/templates/:template_id
pub async fn get_template(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(template_id): Path<Uuid>,
) -> Result<Json<CustomTemplate>, ApiError> {
    let template = CustomTemplateRepository::new(state.pool.clone())
        .find_visible(template_id, user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;
    Ok(Json(template.into()))
}

/// PUT /api/v1/templates/:template_id
pub async fn update_template(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(template_id): Path<Uuid>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<CustomTemplate>, ApiError> {
    request.validate()?;

    let template = CustomTemplateRepository::new(state.pool.clone())
        .update(template_id, user_auth.user_id, &request)
        .await?
        .ok_or_else(|| ApiError::NotFound("Template not found".to_string()))?;

    info!(template_id = %template_id, user_id = %user_auth.user_id, "Template updated");
    Ok(Json(template.into()))
}

/// DELETE /api/v1/templates/:template_id
pub async fn delete_template(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(template_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = CustomTemplateRepository::new(state.pool.clone())
        .delete(template_id, user_auth.user_id)
        .await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Template not found".to_string()));
    }

    info!(template_id = %template_id, user_id = %user_auth.user_id, "Template deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ListLocalTemplatesResponse {
    pub data: Vec<LocalTemplateRecord>,
    pub total: usize,
}

/// Templates saved locally while the database was unavailable.
///
/// GET /api/v1/templates/local
pub async fn list_local_templates(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListLocalTemplatesResponse>, ApiError> {
    let data = state.saver.list_pending(user_auth.user_id).await?;
    Ok(Json(ListLocalTemplatesResponse {
        total: data.len(),
        data,
    }))
}

/// Pushes the caller's local templates to the database now.
///
/// POST /api/v1/templates/sync
pub async fn sync_local_templates(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<SyncReport>, ApiError> {
    let report = state.saver.sync_pending(Some(user_auth.user_id)).await?;
    record_template_sync(&report);

    info!(
        user_id = %user_auth.user_id,
        synced = report.synced,
        remaining = report.remaining,
        "Manual template sync"
    );
    Ok(Json(report))
}
