use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use edusync_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

const SESSION_TTL_DAYS: i64 = 30;

/// The authenticated user behind a request, if it carried a session token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub username: String,
}

/// Extractor for the optional session attached by [`attach_session`].
pub struct CurrentSession(pub Option<Session>);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<Session>().cloned()))
    }
}

impl CurrentSession {
    /// Rejects when the session belongs to someone other than `user_id`.
    /// Requests without a session pass.
    pub fn authorize(&self, user_id: i64) -> Result<(), ApiError> {
        match &self.0 {
            Some(session) if session.user_id != user_id => Err(ApiError::Forbidden(
                "Session does not match the requested user".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Validate a bearer token if present and attach the session to the request.
/// A request without an Authorization header passes through untouched.
pub async fn attach_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Malformed Authorization header".into()))?;

        let claims = decode_token(&state.jwt_secret, token)?;
        req.extensions_mut().insert(Session {
            user_id: claims.sub,
            username: claims.username,
        });
    }

    Ok(next.run(req).await)
}

pub fn create_token(secret: &str, user_id: i64, username: &str) -> Result<String, ApiError> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(SESSION_TTL_DAYS)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token encoding failed: {e}")))
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("Invalid or expired session".into()))
}
