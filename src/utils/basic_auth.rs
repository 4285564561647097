// src/utils/basic_auth.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use base64::{Engine, engine::general_purpose::STANDARD};

use crate::{error::AppError, models::user::Role, services::auth::AuthService};

/// Username and password from an `Authorization: Basic ...` header.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Decodes a Basic authorization header value. `None` for any other scheme or malformed input.
pub fn decode_basic(header_value: &str) -> Option<Credentials> {
    let (scheme, encoded) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// The authenticated caller.
///
/// Extracting it re-checks the Basic credentials against the users table on
/// every request; there are no sessions or tokens. Rejects with 401.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i32,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    AuthService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let credentials = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(decode_basic)
            .ok_or_else(|| AppError::AuthError("Authentication required".to_string()))?;

        let auth = AuthService::from_ref(state);
        let user = auth
            .authenticate(&credentials.username, &credentials.password)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        Ok(AuthUser {
            id: user.id,
            role: user.role(),
            username: user.username,
        })
    }
}
