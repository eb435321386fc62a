//! Authentication middleware
//!
//! Verifies the bearer JWT issued by the external identity service and makes
//! the authenticated user available to handlers. Token issuance, password
//! handling and account management all live outside this service.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::AppError, models::UserRole, state::AppState};

/// JWT claims issued by the identity service
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: i64,
    pub username: String,
    pub name: String,
    pub role: String,
    /// Expiry (unix seconds)
    pub exp: i64,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub role: UserRole,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Verify a bearer token and parse its claims into an [`AuthenticatedUser`].
pub fn verify_token(token: &str, secret: &str) -> Result<AuthenticatedUser, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })?;

    let role = data
        .claims
        .role
        .parse::<UserRole>()
        .map_err(|_| AppError::InvalidToken)?;

    Ok(AuthenticatedUser {
        id: data.claims.sub,
        username: data.claims.username,
        name: data.claims.name,
        role,
    })
}

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let user = verify_token(token, &state.config().jwt.secret)?;
    debug!(user_id = user.id, role = %user.role, "Token verified");

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(role: &str, exp: i64) -> String {
        let claims = Claims {
            sub: 42,
            username: "jdoe".to_string(),
            name: "J. Doe".to_string(),
            role: role.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn verifies_a_valid_token() {
        let token = token_for("chief_judge", future_exp());
        let user = verify_token(&token, "test-secret").unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.role, UserRole::ChiefJudge);
    }

    #[test]
    fn rejects_wrong_secret_and_unknown_role() {
        let token = token_for("judge", future_exp());
        assert!(matches!(
            verify_token(&token, "other-secret"),
            Err(AppError::InvalidToken)
        ));

        let token = token_for("superuser", future_exp());
        assert!(matches!(
            verify_token(&token, "test-secret"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let token = token_for("judge", chrono::Utc::now().timestamp() - 3600);
        assert!(matches!(
            verify_token(&token, "test-secret"),
            Err(AppError::TokenExpired)
        ));
    }
}
