use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::editor::EditorError;
use domain::services::template_save::{LocalStoreError, SaveError};
use serde::Serialize;
use shared::pagination::CursorError;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                msg.clone(),
            ),
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            sqlx::Error::Database(db_err) => {
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => ApiError::Conflict("Resource already exists".into()),
                        "23503" => ApiError::NotFound("Referenced resource not found".into()),
                        "42P01" => ApiError::ServiceUnavailable(
                            "Database is not set up yet".into(),
                        ),
                        _ => ApiError::Internal(format!("Database error: {}", db_err)),
                    }
                } else {
                    ApiError::Internal(format!("Database error: {}", db_err))
                }
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                ApiError::ServiceUnavailable("Database is unreachable".into())
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Flattens nested validation errors into `path.to.field` entries.
pub fn validation_details(errors: &ValidationErrors) -> Vec<ValidationDetail> {
    fn walk(prefix: &str, errors: &ValidationErrors, out: &mut Vec<ValidationDetail>) {
        for (field, kind) in errors.errors() {
            let path = if prefix.is_empty() {
                field.to_string()
            } else {
                format!("{}.{}", prefix, field)
            };
            match kind {
                ValidationErrorsKind::Field(errs) => {
                    out.extend(errs.iter().map(|e| ValidationDetail {
                        field: path.clone(),
                        message: e
                            .message
                            .clone()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", path)),
                    }))
                }
                ValidationErrorsKind::Struct(inner) => walk(&path, inner, out),
                ValidationErrorsKind::List(items) => {
                    for (idx, inner) in items {
                        walk(&format!("{}[{}]", path, idx), inner, out);
                    }
                }
            }
        }
    }

    let mut out = Vec::new();
    walk("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let details = validation_details(&errors);

        let message = match details.as_slice() {
            [only] => only.message.clone(),
            many => format!(
                "{} validation errors: {}",
                many.len(),
                many.iter()
                    .map(|d| d.field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };

        ApiError::Validation(message)
    }
}

impl From<EditorError> for ApiError {
    fn from(err: EditorError) -> Self {
        match err {
            EditorError::SignInRequired => ApiError::Unauthorized(err.to_string()),
            EditorError::SaveInProgress => ApiError::Conflict(err.to_string()),
            EditorError::NameRequired
            | EditorError::InvalidColor(_)
            | EditorError::InvalidFont(_)
            | EditorError::UnknownPreset(_) => ApiError::Validation(err.to_string()),
        }
    }
}

impl From<SaveError> for ApiError {
    fn from(err: SaveError) -> Self {
        tracing::error!(error = %err, "Template save failed in both stores");
        ApiError::ServiceUnavailable(
            "Template could not be saved. Please try again later.".into(),
        )
    }
}

impl From<LocalStoreError> for ApiError {
    fn from(err: LocalStoreError) -> Self {
        ApiError::Internal(format!("Local storage error: {}", err))
    }
}

impl From<CursorError> for ApiError {
    fn from(err: CursorError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use validator::Validate;

    #[test]
    fn test_api_error_statuses() {
        let cases = [
            (ApiError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::CONFLICT),
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            format!("{}", ApiError::Unauthorized("test".to_string())),
            "Unauthorized: test"
        );
        assert_eq!(
            format!("{}", ApiError::Validation("test".to_string())),
            "Validation error: test"
        );
        assert_eq!(format!("{}", ApiError::RateLimited), "Rate limited");
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::NotFound("Invitation not found".into()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "Invitation not found");
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = ApiError::Internal("password=hunter2".into()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(!String::from_utf8_lossy(&body).contains("hunter2"));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        match error {
            ApiError::NotFound(msg) => assert_eq!(msg, "Resource not found"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_from_sqlx_pool_timeout() {
        let error: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(error, ApiError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_nested_validation_paths() {
        let mut config = domain::models::template::TemplateConfig::default();
        config.colors.primary = "not-a-color".into();
        config.layout.spacing = 999;

        let errors = config.validate().unwrap_err();
        let fields: Vec<String> = validation_details(&errors)
            .into_iter()
            .map(|d| d.field)
            .collect();
        assert_eq!(fields, vec!["colors.primary", "layout.spacing"]);

        let api: ApiError = errors.into();
        match api {
            ApiError::Validation(msg) => {
                assert!(msg.starts_with("2 validation errors"));
                assert!(msg.contains("colors.primary"));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_editor_error_mapping() {
        assert!(matches!(
            ApiError::from(EditorError::SignInRequired),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from(EditorError::NameRequired),
            ApiError::Validation(_)
        ));
        assert!(matches!(
            ApiError::from(EditorError::SaveInProgress),
            ApiError::Conflict(_)
        ));
    }

    #[test]
    fn test_cursor_error_is_validation() {
        assert!(matches!(
            ApiError::from(CursorError::InvalidEncoding),
            ApiError::Validation(_)
        ));
    }
}
