// src/models/user.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Russian mobile number: `+7(987)654-32-10`, `+7 987 654-32-10`, `+79876543210`.
pub static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+7\s?\(?\d{3}\)?\s?\d{3}-?\d{2}-?\d{2}$").expect("phone pattern compiles")
});

const AUTHORITY_PREFIX: &str = "ROLE_";

/// Access role. Admins bypass ownership checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Authority string persisted in `users.authority`, e.g. `ROLE_ADMIN`.
    pub fn authority(self) -> String {
        format!("{AUTHORITY_PREFIX}{}", self.as_str())
    }

    /// Parses a persisted authority. Accepts the bare role name as well.
    pub fn from_authority(authority: &str) -> Option<Self> {
        match authority.strip_prefix(AUTHORITY_PREFIX).unwrap_or(authority) {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,

    /// Unique login, email-shaped.
    pub username: String,

    /// Argon2 password hash.
    pub password: String,

    pub first_name: String,
    pub last_name: String,
    pub phone: String,

    /// Role-prefixed authority, e.g. `ROLE_USER`.
    pub authority: String,

    /// Avatar path under `/images/`.
    pub image: Option<String>,
}

impl User {
    /// Unknown authorities fall back to the least privileged role.
    pub fn role(&self) -> Role {
        Role::from_authority(&self.authority).unwrap_or_default()
    }
}

/// Insert payload for a new user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
}

/// DTO for the authenticated user's profile.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub image: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let role = user.role();
        Self {
            id: user.id,
            email: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            role,
            image: user.image,
        }
    }
}

/// DTO for creating a new user (Registration).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(
        email(message = "Login must be an email address, e.g. example@mail.ru"),
        length(min = 4, max = 32, message = "Login length must be between 4 and 32 characters")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 16, message = "Password length must be between 8 and 16 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 16, message = "First name length must be between 2 and 16 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 16, message = "Last name length must be between 2 and 16 characters"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must look like +7(987)654-32-10"))]
    pub phone: String,

    #[serde(default)]
    pub role: Role,
}

/// DTO for user login.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(
        email(message = "Login must be an email address, e.g. example@mail.ru"),
        length(min = 4, max = 32, message = "Login length must be between 4 and 32 characters")
    )]
    pub username: String,

    #[validate(length(min = 8, max = 16, message = "Password length must be between 8 and 16 characters"))]
    pub password: String,
}

/// DTO for updating the profile. Echoed back on success.
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 10, message = "First name length must be between 3 and 10 characters"))]
    pub first_name: String,

    #[validate(length(min = 3, max = 10, message = "Last name length must be between 3 and 10 characters"))]
    pub last_name: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Phone must look like +7(987)654-32-10"))]
    pub phone: String,
}

/// DTO for the password change flow.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, max = 16, message = "Current password length must be between 8 and 16 characters"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 16, message = "New password length must be between 8 and 16 characters"))]
    pub new_password: String,
}
