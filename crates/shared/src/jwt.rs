//! JWT access token utilities.
//!
//! Tokens are issued by the external auth provider and signed with a shared
//! HS256 secret (the hosted Postgres/auth convention). This module validates
//! them and, for tooling and tests, can mint tokens with the same shape.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Role claim carried by tokens that may provision the database schema.
pub const SERVICE_ROLE: &str = "service_role";

/// Role claim carried by ordinary signed-in users.
pub const AUTHENTICATED_ROLE: &str = "authenticated";

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID, absent on some provider-issued tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Database role the token acts as (`authenticated`, `service_role`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

impl Claims {
    /// Whether the token may run privileged maintenance such as schema setup.
    pub fn is_service_role(&self) -> bool {
        self.role.as_deref() == Some(SERVICE_ROLE)
    }
}

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds
    pub access_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
    /// Expected `aud` claim; audience is not checked when unset
    pub audience: Option<String>,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("audience", &self.audience)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Shortest secret accepted for HS256 signing.
pub const MIN_SECRET_LEN: usize = 32;

impl JwtConfig {
    /// Creates a new JwtConfig from the provider's shared signing secret.
    pub fn new(
        secret: &str,
        access_token_expiry_secs: i64,
        leeway_secs: u64,
        audience: Option<String>,
    ) -> Result<Self, JwtError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::InvalidKey(format!(
                "Secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            leeway_secs,
            audience,
        })
    }

    /// Generates an access token for the given user.
    ///
    /// Returns `(token, jti)`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        role: &str,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let exp = (now + Duration::seconds(self.access_token_expiry_secs)).timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            exp,
            iat: now.timestamp(),
            jti: Some(jti.clone()),
            email: email.map(str::to_string),
            role: Some(role.to_string()),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        match &self.audience {
            Some(aud) => validation.set_audience(&[aud.as_str()]),
            None => validation.validate_aud = false,
        }

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }
}

/// Extracts user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    const SECRET: &str = "test_secret_key_for_jwt_testing_12345";

    fn create_test_config() -> JwtConfig {
        JwtConfig::new(SECRET, 900, 0, None).unwrap()
    }

    #[test]
    fn test_short_secret_rejected() {
        let result = JwtConfig::new("short", 900, 0, None);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_generate_access_token() {
        let config = create_test_config();
        let (token, jti) = config
            .generate_access_token(Uuid::new_v4(), None, AUTHENTICATED_ROLE)
            .unwrap();

        assert!(!token.is_empty());
        assert!(!jti.is_empty());
        assert_eq!(token.matches('.').count(), 2);
    }

    #[test]
    fn test_validate_access_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config
            .generate_access_token(user_id, Some("bride@example.com"), AUTHENTICATED_ROLE)
            .unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti.as_deref(), Some(jti.as_str()));
        assert_eq!(claims.email.as_deref(), Some("bride@example.com"));
        assert!(!claims.is_service_role());
    }

    #[test]
    fn test_service_role_claim() {
        let config = create_test_config();
        let (token, _) = config
            .generate_access_token(Uuid::new_v4(), None, SERVICE_ROLE)
            .unwrap();

        assert!(config.validate_token(&token).unwrap().is_service_role());
    }

    #[test]
    fn test_token_signed_with_other_secret_rejected() {
        let config = create_test_config();
        let other = JwtConfig::new("another_secret_key_for_jwt_testing_999", 900, 0, None).unwrap();
        let (token, _) = other
            .generate_access_token(Uuid::new_v4(), None, AUTHENTICATED_ROLE)
            .unwrap();

        assert!(matches!(
            config.validate_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_audience_mismatch_rejected() {
        let issuer =
            JwtConfig::new(SECRET, 900, 0, Some("anon".to_string())).unwrap();
        let verifier =
            JwtConfig::new(SECRET, 900, 0, Some("authenticated".to_string())).unwrap();
        let (token, _) = issuer
            .generate_access_token(Uuid::new_v4(), None, AUTHENTICATED_ROLE)
            .unwrap();

        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn test_audience_ignored_when_unset() {
        let issuer =
            JwtConfig::new(SECRET, 900, 0, Some("authenticated".to_string())).unwrap();
        let verifier = create_test_config();
        let (token, _) = issuer
            .generate_access_token(Uuid::new_v4(), None, AUTHENTICATED_ROLE)
            .unwrap();

        assert!(verifier.validate_token(&token).is_ok());
    }

    #[test]
    fn test_expired_token() {
        let mut config = create_test_config();
        config.access_token_expiry_secs = 1;

        let (token, _) = config
            .generate_access_token(Uuid::new_v4(), None, AUTHENTICATED_ROLE)
            .unwrap();

        sleep(StdDuration::from_secs(2));

        let result = config.validate_token(&token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
        assert!(config.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, _) = config
            .generate_access_token(user_id, None, AUTHENTICATED_ROLE)
            .unwrap();
        let claims = config.validate_token(&token).unwrap();

        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_extract_user_id_rejects_non_uuid_subject() {
        let claims = Claims {
            sub: "anonymous".to_string(),
            exp: 0,
            iat: 0,
            jti: None,
            email: None,
            role: None,
            aud: None,
        };
        assert!(matches!(
            extract_user_id(&claims),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_claims_without_optional_fields_deserialize() {
        let raw = r#"{"sub":"abc","exp":10,"iat":1}"#;
        let claims: Claims = serde_json::from_str(raw).unwrap();
        assert!(claims.jti.is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", create_test_config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains(SECRET));
    }
}
