//! User JWT authentication extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::{extract_user_id, JwtConfig};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Caller identity from a validated access token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Database role claim, e.g. `authenticated` or `service_role`
    pub role: Option<String>,
}

impl UserAuth {
    pub fn validate(jwt: &JwtConfig, token: &str) -> Result<Self, ApiError> {
        let claims = jwt.validate_token(token).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;
        let user_id = extract_user_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid user ID in token".to_string()))?;

        Ok(Self {
            user_id,
            email: claims.email.clone(),
            role: claims.role.clone(),
        })
    }

    pub fn is_service_role(&self) -> bool {
        self.role.as_deref() == Some(shared::jwt::SERVICE_ROLE)
    }

    /// Rejects callers without the `service_role` claim.
    pub fn require_service_role(&self) -> Result<(), ApiError> {
        if self.is_service_role() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Database setup requires a service role token".to_string(),
            ))
        }
    }
}

/// Returns the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let header = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;
    header
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim()))
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(parts)?
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;
        UserAuth::validate(&state.jwt, token)
    }
}

/// Identity when a valid token is present; never rejects.
#[derive(Debug, Clone)]
pub struct OptionalUserAuth(pub Option<UserAuth>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(OptionalUserAuth(Some(auth.clone())));
        }

        let auth = match bearer_token(parts) {
            Ok(Some(token)) => UserAuth::validate(&state.jwt, token).ok(),
            _ => None,
        };
        Ok(OptionalUserAuth(auth))
    }
}
