// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode};

use crate::{
    error::{AppError, ErrorBody},
    models::user::{LoginRequest, RegisterRequest},
    services::auth::AuthService,
    utils::validation::ValidJson,
};

/// Creates an account. 201 on success, 400 when the username is taken.
#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Invalid data or username taken", body = ErrorBody)
    )
)]
pub async fn register(
    State(auth): State<AuthService>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<StatusCode, AppError> {
    auth.register(payload).await?;
    Ok(StatusCode::CREATED)
}

/// Credential check only; clients send Basic credentials on every later request.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials are valid"),
        (status = 401, description = "Unknown user or wrong password", body = ErrorBody)
    )
)]
pub async fn login(
    State(auth): State<AuthService>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<StatusCode, AppError> {
    if auth.login(&payload.username, &payload.password).await? {
        Ok(StatusCode::OK)
    } else {
        Err(AppError::AuthError("Invalid username or password".to_string()))
    }
}
