// src/handlers/users.rs

use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::{
    error::{AppError, ErrorBody},
    models::user::{NewPasswordRequest, UpdateUserRequest, UserResponse},
    openapi::ImageForm,
    services::users::UserService,
    utils::{basic_auth::AuthUser, multipart::read_image, validation::ValidJson},
};

/// Profile of the authenticated user.
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("basicAuth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn get_me(
    State(users): State<UserService>,
    user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    Ok(Json(users.get_me(&user.username).await?))
}

#[utoipa::path(
    patch,
    path = "/users/me",
    tag = "Users",
    security(("basicAuth" = [])),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = UpdateUserRequest),
        (status = 400, description = "Invalid data", body = ErrorBody)
    )
)]
pub async fn update_me(
    State(users): State<UserService>,
    user: AuthUser,
    ValidJson(payload): ValidJson<UpdateUserRequest>,
) -> Result<Json<UpdateUserRequest>, AppError> {
    Ok(Json(users.update_me(&user.username, payload).await?))
}

/// The previous avatar is removed later by the image janitor.
#[utoipa::path(
    patch,
    path = "/users/me/image",
    tag = "Users",
    security(("basicAuth" = [])),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Avatar replaced"),
        (status = 400, description = "Missing image part", body = ErrorBody)
    )
)]
pub async fn update_avatar(
    State(users): State<UserService>,
    user: AuthUser,
    multipart: Multipart,
) -> Result<(), AppError> {
    let image = read_image(multipart).await?;
    users.update_avatar(&user.username, image).await
}

#[utoipa::path(
    post,
    path = "/users/set_password",
    tag = "Users",
    security(("basicAuth" = [])),
    request_body = NewPasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 403, description = "Current password is wrong", body = ErrorBody)
    )
)]
pub async fn set_password(
    State(users): State<UserService>,
    user: AuthUser,
    ValidJson(payload): ValidJson<NewPasswordRequest>,
) -> Result<(), AppError> {
    users.set_password(&user.username, payload).await
}
