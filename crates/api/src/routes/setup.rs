//! Database provisioning endpoints.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::setup::{DatabaseStatus, SetupReport};
use persistence::schema;
use tracing::{info, warn};

use crate::app::AppState;
use crate::extractors::UserAuth;

/// Table presence check.
///
/// GET /api/v1/setup/status
pub async fn database_status(
    State(state): State<AppState>,
    _user_auth: UserAuth,
) -> Json<DatabaseStatus> {
    Json(schema::check_database_status(&state.pool).await)
}

fn report_response(report: SetupReport) -> (StatusCode, Json<SetupReport>) {
    let status = if report.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(report))
}

/// Creates missing tables, policies and triggers.
///
/// POST /api/v1/setup
///
/// Requires the `service_role` claim. Safe to run repeatedly.
pub async fn run_setup(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<(StatusCode, Json<SetupReport>), crate::error::ApiError> {
    user_auth.require_service_role()?;

    let report =
        schema::setup_database(&state.pool, state.config.database.provision_options()).await;
    if report.success {
        info!(user_id = %user_auth.user_id, steps = report.steps.len(), "Database setup completed");
    } else {
        warn!(
            user_id = %user_auth.user_id,
            failed_step = ?report.failed_step(),
            "Database setup failed"
        );
    }
    Ok(report_response(report))
}

/// Re-runs the full setup. Existing tables and rows are kept.
///
/// POST /api/v1/setup/reset
pub async fn run_reset(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<(StatusCode, Json<SetupReport>), crate::error::ApiError> {
    user_auth.require_service_role()?;

    warn!(user_id = %user_auth.user_id, "Database reset requested");
    let report =
        schema::reset_database(&state.pool, state.config.database.provision_options()).await;
    Ok(report_response(report))
}
