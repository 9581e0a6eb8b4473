//! Supabase JWT verification.
//!
//! Login/registration live in Supabase; this backend only verifies the
//! HS256 access token on incoming requests and exposes the user identity
//! as an axum extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config::SETTINGS;

/// Claims Supabase puts in its access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: usize,
}

/// Authenticated user identity, extracted from the bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
}

fn unauthorized(message: &str) -> (StatusCode, Json<AuthError>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(AuthError {
            error: message.to_string(),
        }),
    )
}

/// Verify an HS256 token against the project JWT secret.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    // Supabase issues access tokens with aud = "authenticated".
    validation.set_audience(&["authenticated"]);

    decode::<Claims>(token, &key, &validation).map(|data| data.claims)
}

pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<AuthError>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| unauthorized("Missing Authorization header"))?;

        let token = extract_bearer_token(auth_header)
            .ok_or_else(|| unauthorized("Authorization header must be a Bearer token"))?;

        let claims = verify_token(token, &SETTINGS.supabase_jwt_secret).map_err(|e| {
            tracing::warn!("token rejected: {e}");
            unauthorized("Invalid or expired token")
        })?;

        Ok(AuthUser {
            id: claims.sub,
            email: claims.email,
            role: claims.role.unwrap_or_else(|| "authenticated".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(claims: &serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_bearer_extraction() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }

    #[test]
    fn test_valid_token_roundtrip() {
        let exp = chrono::Utc::now().timestamp() as usize + 3600;
        let token = make_token(
            &serde_json::json!({
                "sub": "user-1",
                "email": "a@b.c",
                "role": "authenticated",
                "aud": "authenticated",
                "exp": exp,
            }),
            "test-secret",
        );

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let exp = chrono::Utc::now().timestamp() as usize + 3600;
        let token = make_token(
            &serde_json::json!({ "sub": "u", "aud": "authenticated", "exp": exp }),
            "secret-a",
        );
        assert!(verify_token(&token, "secret-b").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let exp = chrono::Utc::now().timestamp() as usize - 3600;
        let token = make_token(
            &serde_json::json!({ "sub": "u", "aud": "authenticated", "exp": exp }),
            "test-secret",
        );
        assert!(verify_token(&token, "test-secret").is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let exp = chrono::Utc::now().timestamp() as usize + 3600;
        let token = make_token(
            &serde_json::json!({ "sub": "u", "aud": "anon", "exp": exp }),
            "test-secret",
        );
        assert!(verify_token(&token, "test-secret").is_err());
    }
}
