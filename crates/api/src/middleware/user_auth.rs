//! User JWT authentication middleware.
//!
//! Route groups behind `require_user_auth` reject requests without a valid
//! bearer token; handlers then read [`UserAuth`] from the request extensions.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::user_auth::{bearer_token, UserAuth};

pub async fn require_user_auth(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth = match bearer_token(&parts) {
        Ok(Some(token)) => UserAuth::validate(&state.jwt, token),
        Ok(None) => Err(ApiError::Unauthorized(
            "Missing or invalid Authorization header".to_string(),
        )),
        Err(e) => Err(e),
    };

    match auth {
        Ok(auth) => {
            tracing::debug!(user_id = %auth.user_id, "Request authenticated");
            parts.extensions.insert(auth);
            next.run(Request::from_parts(parts, body)).await
        }
        Err(e) => e.into_response(),
    }
}
